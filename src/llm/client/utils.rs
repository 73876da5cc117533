use crate::config::LLMConfig;

/// 超过该长度的prompt改用高质量模型
pub const EFFICIENT_PROMPT_LIMIT: usize = 32 * 1024;

/// 根据prompt长度选择模型
pub fn evaluate_befitting_model(
    llm_config: &LLMConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> String {
    if system_prompt.len() + user_prompt.len() <= EFFICIENT_PROMPT_LIMIT {
        return llm_config.model_efficient.clone();
    }
    llm_config.model_powerful.clone()
}
