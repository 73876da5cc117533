//! LLM Provider支持模块

use anyhow::Result;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::Prompt,
    providers::gemini::completion::gemini_api_types::{AdditionalParameters, GenerationConfig},
};

use crate::config::{LLMConfig, LLMProvider};

/// 统一的Provider客户端枚举
#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(rig::providers::openai::Client),
    Moonshot(rig::providers::moonshot::Client),
    DeepSeek(rig::providers::deepseek::Client),
    Mistral(rig::providers::mistral::Client),
    OpenRouter(rig::providers::openrouter::Client),
    Anthropic(rig::providers::anthropic::Client),
    Gemini(rig::providers::gemini::Client),
    Ollama(rig::providers::ollama::Client),
}

impl ProviderClient {
    /// 根据配置创建相应的provider客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let client = match config.provider {
            LLMProvider::OpenAI => ProviderClient::OpenAI(
                rig::providers::openai::Client::builder(&config.api_key)
                    .base_url(&config.api_base_url)
                    .build(),
            ),
            LLMProvider::Moonshot => ProviderClient::Moonshot(
                rig::providers::moonshot::Client::builder(&config.api_key)
                    .base_url(&config.api_base_url)
                    .build(),
            ),
            LLMProvider::DeepSeek => ProviderClient::DeepSeek(
                rig::providers::deepseek::Client::builder(&config.api_key)
                    .base_url(&config.api_base_url)
                    .build(),
            ),
            LLMProvider::Mistral => ProviderClient::Mistral(
                rig::providers::mistral::Client::builder(&config.api_key).build(),
            ),
            LLMProvider::OpenRouter => ProviderClient::OpenRouter(
                rig::providers::openrouter::Client::builder(&config.api_key).build(),
            ),
            LLMProvider::Anthropic => ProviderClient::Anthropic(
                rig::providers::anthropic::ClientBuilder::new(&config.api_key).build()?,
            ),
            LLMProvider::Gemini => ProviderClient::Gemini(
                rig::providers::gemini::Client::builder(&config.api_key).build()?,
            ),
            LLMProvider::Ollama => {
                ProviderClient::Ollama(rig::providers::ollama::Client::builder().build())
            }
        };
        Ok(client)
    }

    /// 创建单轮对话Agent
    pub fn create_agent(
        &self,
        model: &str,
        system_prompt: &str,
        config: &LLMConfig,
    ) -> Result<ProviderAgent> {
        let agent = match self {
            ProviderClient::OpenAI(client) => ProviderAgent::OpenAI(
                client
                    .completion_model(model)
                    .completions_api()
                    .into_agent_builder()
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .build(),
            ),
            ProviderClient::Moonshot(client) => ProviderAgent::Moonshot(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .temperature(config.temperature)
                    .build(),
            ),
            ProviderClient::DeepSeek(client) => ProviderAgent::DeepSeek(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .temperature(config.temperature)
                    .build(),
            ),
            ProviderClient::Mistral(client) => ProviderAgent::Mistral(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .temperature(config.temperature)
                    .build(),
            ),
            ProviderClient::OpenRouter(client) => ProviderAgent::OpenRouter(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .temperature(config.temperature)
                    .build(),
            ),
            ProviderClient::Anthropic(client) => ProviderAgent::Anthropic(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .build(),
            ),
            ProviderClient::Gemini(client) => {
                let params =
                    AdditionalParameters::default().with_config(GenerationConfig::default());
                ProviderAgent::Gemini(
                    client
                        .agent(model)
                        .preamble(system_prompt)
                        .max_tokens(config.max_tokens.into())
                        .temperature(config.temperature)
                        .additional_params(serde_json::to_value(params)?)
                        .build(),
                )
            }
            ProviderClient::Ollama(client) => ProviderAgent::Ollama(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .build(),
            ),
        };
        Ok(agent)
    }
}

/// 统一的Agent枚举
pub enum ProviderAgent {
    OpenAI(Agent<rig::providers::openai::CompletionModel>),
    Mistral(Agent<rig::providers::mistral::CompletionModel>),
    OpenRouter(Agent<rig::providers::openrouter::CompletionModel>),
    Anthropic(Agent<rig::providers::anthropic::completion::CompletionModel>),
    Gemini(Agent<rig::providers::gemini::completion::CompletionModel>),
    Moonshot(Agent<rig::providers::moonshot::CompletionModel>),
    DeepSeek(Agent<rig::providers::deepseek::CompletionModel>),
    Ollama(Agent<rig::providers::ollama::CompletionModel<reqwest::Client>>),
}

impl ProviderAgent {
    /// 执行prompt
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        match self {
            ProviderAgent::OpenAI(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Moonshot(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::DeepSeek(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Mistral(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::OpenRouter(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Anthropic(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Gemini(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Ollama(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
        }
    }
}
