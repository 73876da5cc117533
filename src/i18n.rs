use serde::{Deserialize, Serialize};

/// 报告语言
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum TargetLanguage {
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "en")]
    #[default]
    English,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "ru")]
    Russian,
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::Chinese => write!(f, "zh"),
            TargetLanguage::English => write!(f, "en"),
            TargetLanguage::Japanese => write!(f, "ja"),
            TargetLanguage::Korean => write!(f, "ko"),
            TargetLanguage::German => write!(f, "de"),
            TargetLanguage::French => write!(f, "fr"),
            TargetLanguage::Russian => write!(f, "ru"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zh" | "chinese" | "中文" => Ok(TargetLanguage::Chinese),
            "en" | "english" | "英文" => Ok(TargetLanguage::English),
            "ja" | "japanese" | "日本語" | "日文" => Ok(TargetLanguage::Japanese),
            "ko" | "korean" | "한국어" | "韩文" => Ok(TargetLanguage::Korean),
            "de" | "german" | "deutsch" | "德文" => Ok(TargetLanguage::German),
            "fr" | "french" | "français" | "法文" => Ok(TargetLanguage::French),
            "ru" | "russian" | "русский" | "俄文" => Ok(TargetLanguage::Russian),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

impl TargetLanguage {
    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "中文",
            TargetLanguage::English => "English",
            TargetLanguage::Japanese => "日本語",
            TargetLanguage::Korean => "한국어",
            TargetLanguage::German => "Deutsch",
            TargetLanguage::French => "Français",
            TargetLanguage::Russian => "Русский",
        }
    }

    /// 获取语言的提示词指令，附加在每次模型调用的系统提示词之后
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "请使用中文撰写，语言准确、友好、便于旅行者理解。",
            TargetLanguage::English => {
                "Please write your answer in English, using accurate, friendly and easy-to-understand language for travelers."
            }
            TargetLanguage::Japanese => {
                "日本語で回答してください。旅行者にとって正確で親しみやすく、分かりやすい表現を心がけてください。"
            }
            TargetLanguage::Korean => {
                "한국어로 답변해 주세요. 여행자가 이해하기 쉽도록 정확하고 친근한 표현을 사용해 주세요."
            }
            TargetLanguage::German => {
                "Bitte antworten Sie auf Deutsch, in präziser, freundlicher und für Reisende leicht verständlicher Sprache."
            }
            TargetLanguage::French => {
                "Veuillez répondre en français, dans un langage précis, chaleureux et facile à comprendre pour les voyageurs."
            }
            TargetLanguage::Russian => {
                "Пожалуйста, отвечайте на русском языке, точно, доброжелательно и понятно для путешественников."
            }
        }
    }
}
