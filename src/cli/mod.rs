use crate::config::{Config, DEFAULT_CONFIG_FILE, LLMProvider};
use crate::i18n::TargetLanguage;
use crate::types::trip::TripRequest;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Tripwise - 由Rust与AI驱动的旅行规划报告生成器
#[derive(Parser, Debug)]
#[command(name = "tripwise")]
#[command(
    about = "AI-assisted travel planner. It gathers weather, hotels, flights, local transport, restaurants and attractions for a destination, estimates the trip cost and writes a printable travel report."
)]
#[command(version)]
pub struct Args {
    /// 目的地城市名称
    #[arg(long)]
    pub city: String,

    /// 出发机场代码
    #[arg(long)]
    pub origin: String,

    /// 到达机场代码
    #[arg(long)]
    pub destination: String,

    /// 去程日期 (YYYY-MM-DD)
    #[arg(long)]
    pub outbound_date: String,

    /// 返程日期 (YYYY-MM-DD)，不指定时按单程检索航班
    #[arg(long)]
    pub return_date: Option<String>,

    /// 行程天数
    #[arg(long)]
    pub days: u32,

    /// 输出路径
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 费用估算使用的货币
    #[arg(long)]
    pub currency: Option<String>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 高能效模型，用于常规长度的prompt
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，用于超长prompt
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// LLM Provider (openai, moonshot, deepseek, mistral, openrouter, anthropic, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// 目标语言 (zh, en, ja, ko, de, fr, ru)
    #[arg(long)]
    pub target_language: Option<String>,

    /// 酒店数量上限
    #[arg(long)]
    pub hotels: Option<usize>,

    /// 餐厅数量上限
    #[arg(long)]
    pub restaurants: Option<usize>,

    /// 额外检索目的地中心附近的交通站点
    #[arg(long)]
    pub with_nearby_transport: bool,

    /// 不生成可打印文档，只保存markdown报告
    #[arg(long)]
    pub no_document: bool,

    /// 同时保存流水线状态快照
    #[arg(long)]
    pub save_state: bool,

    /// 跳过启动时的模型连接检查
    #[arg(long)]
    pub skip_connection_check: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(&self) -> Result<Config> {
        let mut config = if let Some(config_path) = &self.config {
            // 显式指定了配置文件路径，读取失败直接报错
            Config::from_file(config_path)
                .with_context(|| format!("无法读取配置文件 {:?}", config_path))?
        } else {
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_CONFIG_FILE);

            if default_config_path.exists() {
                Config::from_file(&default_config_path).with_context(|| {
                    format!("无法读取默认配置文件 {:?}", default_config_path)
                })?
            } else {
                Config::default()
            }
        };

        if let Some(output_path) = &self.output_path {
            config.output_path = output_path.clone();
        }
        if let Some(currency) = &self.currency {
            config.currency = currency.trim().to_uppercase();
        }

        // 覆盖LLM配置
        if let Some(provider_str) = &self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider ({})",
                    provider_str, config.llm.provider
                );
            }
        }
        if let Some(llm_api_base_url) = &self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url.clone();
        }
        if let Some(llm_api_key) = &self.llm_api_key {
            config.llm.api_key = llm_api_key.clone();
        }
        if let Some(model_efficient) = &self.model_efficient {
            config.llm.model_efficient = model_efficient.clone();
        }
        if let Some(model_powerful) = &self.model_powerful {
            config.llm.model_powerful = model_powerful.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 目标语言配置
        if let Some(target_language_str) = &self.target_language {
            if let Ok(target_language) = target_language_str.parse::<TargetLanguage>() {
                config.target_language = target_language;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的目标语言: {}，使用默认语言 ({})",
                    target_language_str,
                    config.target_language.display_name()
                );
            }
        }

        // 检索参数
        if let Some(hotels) = self.hotels {
            config.search.hotel_limit = hotels;
        }
        if let Some(restaurants) = self.restaurants {
            config.search.restaurant_limit = restaurants;
        }

        // 开关类参数只能打开或关闭对应功能，不会还原配置文件中的设置
        if self.with_nearby_transport {
            config.include_nearby_transport = true;
        }
        if self.no_document {
            config.render_document = false;
        }
        if self.save_state {
            config.save_state = true;
        }
        if self.skip_connection_check {
            config.check_llm_connection = false;
        }
        if self.verbose {
            config.verbose = true;
        }

        Ok(config)
    }

    /// 由CLI参数构造并校验行程请求
    pub fn trip_request(&self) -> Result<TripRequest> {
        let return_date = match &self.return_date {
            Some(value) => Some(TripRequest::parse_date(value)?),
            None => None,
        };
        let request = TripRequest {
            city: self.city.trim().to_string(),
            origin_city: self.origin.trim().to_string(),
            destination_city: self.destination.trim().to_string(),
            outbound_date: TripRequest::parse_date(&self.outbound_date)?,
            return_date,
            num_days: self.days,
        };
        request.validate()?;
        Ok(request)
    }
}
