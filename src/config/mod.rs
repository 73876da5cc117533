use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::i18n::TargetLanguage;
use crate::types::trip::DEFAULT_BOUNDING_BOX_DELTA;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "tripwise.toml";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Mistral => write!(f, "mistral"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "mistral" => Ok(LLMProvider::Mistral),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 报告输出目录
    pub output_path: PathBuf,

    /// 费用估算使用的货币
    pub currency: String,

    /// 报告语言
    pub target_language: TargetLanguage,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 第三方数据源配置
    pub providers: ProviderConfig,

    /// 检索参数
    pub search: SearchConfig,

    /// 是否将最终报告渲染为可打印文档
    pub render_document: bool,

    /// 是否保存流水线状态快照
    pub save_state: bool,

    /// 是否在local transport之后检索附近的交通站点
    pub include_nearby_transport: bool,

    /// 启动时检查模型连接
    pub check_llm_connection: bool,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，用于常规长度的prompt
    pub model_efficient: String,

    /// 高质量模型，用于超长prompt
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 第三方数据源配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    /// SerpAPI key，用于酒店、餐厅、航班和交通检索
    pub serpapi_key: String,

    /// Geoapify key，用于景点检索
    pub geoapify_key: String,

    /// Open-Meteo 地理编码接口
    pub geocoding_url: String,

    /// Open-Meteo 天气预报接口
    pub weather_url: String,

    /// SerpAPI 检索接口
    pub serpapi_url: String,

    /// Geoapify Places 接口
    pub geoapify_url: String,

    /// Google 搜索的国家代码（gl）
    pub country: String,

    /// Google 搜索的语言（hl）
    pub language: String,

    /// 天气预报时区
    pub weather_timezone: String,

    /// 默认请求超时（秒）
    pub timeout_seconds: u64,

    /// 航班检索超时（秒）
    pub flights_timeout_seconds: u64,

    /// 交通检索超时（秒）
    pub transport_timeout_seconds: u64,
}

/// 检索参数
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// 酒店数量上限
    pub hotel_limit: usize,

    /// 餐厅数量上限
    pub restaurant_limit: usize,

    /// 景点数量上限
    pub attraction_limit: usize,

    /// Geoapify 景点分类
    pub attraction_categories: String,

    /// 包围盒半宽（度）
    pub bounding_box_delta: f64,

    /// 本地交通出行方式
    pub transport_mode: String,

    /// 附近交通站点类型
    pub nearby_transport_type: String,

    /// 地图检索缩放级别
    pub map_zoom: u8,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 未设置 `RUST_LOG` 时使用的日志级别
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("generated_reports"),
            currency: String::from("INR"),
            target_language: TargetLanguage::default(),
            llm: LLMConfig::default(),
            providers: ProviderConfig::default(),
            search: SearchConfig::default(),
            render_document: true,
            save_state: false,
            include_nearby_transport: false,
            check_llm_connection: true,
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("TRIPWISE_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.openai.com/v1"),
            model_efficient: String::from("gpt-4o-mini"),
            model_powerful: String::from("gpt-4o"),
            max_tokens: 4096,
            temperature: 0.0,
            timeout_seconds: 300,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let serpapi_key = std::env::var("SERPAPI_API_KEY")
            .or_else(|_| std::env::var("SERPER_API_KEY"))
            .unwrap_or_default();

        Self {
            serpapi_key,
            geoapify_key: std::env::var("GEOAPIFY_API_KEY").unwrap_or_default(),
            geocoding_url: String::from("https://geocoding-api.open-meteo.com/v1/search"),
            weather_url: String::from("https://api.open-meteo.com/v1/forecast"),
            serpapi_url: String::from("https://serpapi.com/search.json"),
            geoapify_url: String::from("https://api.geoapify.com/v2/places"),
            country: String::from("in"),
            language: String::from("en"),
            weather_timezone: String::from("Asia/Kolkata"),
            timeout_seconds: 10,
            flights_timeout_seconds: 30,
            transport_timeout_seconds: 15,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            hotel_limit: 5,
            restaurant_limit: 5,
            attraction_limit: 10,
            attraction_categories: String::from(
                "tourism,tourism.sights,tourism.attraction,entertainment.museum,leisure.park",
            ),
            bounding_box_delta: DEFAULT_BOUNDING_BOX_DELTA,
            transport_mode: String::from("transit"),
            nearby_transport_type: String::from("metro station"),
            map_zoom: 14,
        }
    }
}
