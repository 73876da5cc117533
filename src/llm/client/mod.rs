//! LLM客户端 - 基于rig的多provider实现

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::config::LLMConfig;
use crate::llm::CompletionService;

mod providers;
pub mod utils;

use providers::ProviderClient;
use utils::evaluate_befitting_model;

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(config)?;
        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    /// 检查模型连接是否正常
    pub async fn check_connection(&self) -> Result<()> {
        println!("🔄 正在检查模型连接...");
        match self
            .complete("You are a helpful travel assistant.", "Hello")
            .await
        {
            Ok(_) => {
                println!("✅ 模型连接正常");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ 模型连接失败: {}", e);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl CompletionService for LLMClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let model = evaluate_befitting_model(&self.config, system_prompt, user_prompt);
        debug!(
            provider = %self.config.provider,
            model = %model,
            prompt_bytes = system_prompt.len() + user_prompt.len(),
            "调用模型"
        );

        let agent = self
            .client
            .create_agent(&model, system_prompt, &self.config)?;
        let timeout = Duration::from_secs(self.config.timeout_seconds);

        tokio::time::timeout(timeout, agent.prompt(user_prompt))
            .await
            .with_context(|| format!("模型 {} 调用超时（{}秒）", model, timeout.as_secs()))?
    }
}
