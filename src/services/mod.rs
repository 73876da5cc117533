//! 第三方旅行数据源
//!
//! 每个对外方法都自行吞掉错误：记录告警后返回空结果，不中断流水线。

use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub mod geoapify;
pub mod open_meteo;
pub mod serpapi;

pub use geoapify::GeoapifyClient;
pub use open_meteo::OpenMeteoClient;
pub use serpapi::SerpApiClient;

/// 数据源调用错误
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} API key未配置")]
    MissingApiKey(&'static str),

    /// 不含请求地址，地址的query中带有api key
    #[error("HTTP请求失败: {0}")]
    Http(reqwest::Error),

    #[error("{provider} 返回异常状态码 {status}")]
    Status {
        provider: &'static str,
        status: StatusCode,
    },

    #[error("未找到 '{0}' 的匹配结果")]
    NotFound(String),
}

impl ServiceError {
    /// 去掉请求地址后包装，避免api key出现在日志中
    fn from_reqwest(error: reqwest::Error) -> Self {
        ServiceError::Http(error.without_url())
    }
}

/// 发送GET请求并解析JSON响应
pub(crate) async fn get_json<T>(
    http: &reqwest::Client,
    provider: &'static str,
    url: &str,
    query: &[(&str, String)],
    timeout: Duration,
) -> Result<T, ServiceError>
where
    T: DeserializeOwned,
{
    // query中可能带有api key，这里只记录地址
    debug!(provider, url, "请求第三方数据源");

    let response = http
        .get(url)
        .query(query)
        .timeout(timeout)
        .send()
        .await
        .map_err(ServiceError::from_reqwest)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::Status { provider, status });
    }

    response.json::<T>().await.map_err(ServiceError::from_reqwest)
}

/// 所有数据源客户端的集合
#[derive(Clone)]
pub struct TravelServices {
    pub open_meteo: OpenMeteoClient,
    pub serpapi: SerpApiClient,
    pub geoapify: GeoapifyClient,
}

impl TravelServices {
    /// 根据配置创建数据源客户端，共享同一个连接池
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tripwise/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            open_meteo: OpenMeteoClient::new(http.clone(), &config.providers),
            serpapi: SerpApiClient::new(http.clone(), &config.providers, &config.search),
            geoapify: GeoapifyClient::new(http, &config.providers, &config.search),
        })
    }
}
