pub mod attractions;
pub mod expense;
pub mod flights;
pub mod geocode;
pub mod listings;
pub mod report;
pub mod transport;
pub mod weather;

pub use attractions::AttractionsStage;
pub use expense::ExpenseStage;
pub use flights::FlightsStage;
pub use geocode::GeocodeStage;
pub use listings::{HotelsStage, RestaurantsStage};
pub use report::FinalReportStage;
pub use transport::{NearbyTransportStage, TransportStage};
pub use weather::WeatherStage;

use serde_json::Value;
use tracing::warn;

use crate::planner::context::PlannerContext;
use crate::planner::memory::StateKey;
use crate::planner::prompts::{format_dataset, with_language_instruction};

/// 读取字段并渲染为prompt中的JSON文本，缺失时为 `null`
pub(crate) async fn dataset_text(context: &PlannerContext, key: StateKey) -> String {
    let value: Value = context.get_from_memory(key).await.unwrap_or(Value::Null);
    format_dataset(&value)
}

/// 调用模型，失败或返回空文本时使用兜底文本
pub(crate) async fn complete_or_fallback(
    context: &PlannerContext,
    stage_name: &str,
    system_prompt: &str,
    user_prompt: &str,
    fallback: &str,
) -> String {
    let system_prompt = with_language_instruction(
        system_prompt,
        context.config.target_language.prompt_instruction(),
    );

    match context.llm.complete(&system_prompt, user_prompt).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!(stage = stage_name, "模型返回空内容，使用兜底文本");
            fallback.to_string()
        }
        Err(e) => {
            warn!(stage = stage_name, error = %e, "模型调用失败，使用兜底文本");
            eprintln!("⚠️ {} 阶段模型调用失败: {}", stage_name, e);
            fallback.to_string()
        }
    }
}
