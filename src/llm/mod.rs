//! 文本补全服务

use anyhow::Result;
use async_trait::async_trait;

pub mod client;

pub use client::LLMClient;

/// 文本补全服务：输入system与user两段prompt，返回模型回复
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
