use anyhow::Result;
use async_trait::async_trait;

use crate::planner::context::PlannerContext;
use crate::planner::memory::StateKey;
use crate::planner::prompts::{
    EXPENSE_FALLBACK, EXPENSE_SYSTEM_PROMPT, EXPENSE_USER_TEMPLATE, render_template,
};
use crate::planner::stage::{PipelineStage, StageDataConfig, require};
use crate::planner::stages::{complete_or_fallback, dataset_text};
use crate::types::trip::TripRequest;

/// 基于已收集的数据估算单人行程费用，输出自由文本
pub struct ExpenseStage;

impl ExpenseStage {
    pub async fn build_prompt(&self, context: &PlannerContext) -> Result<String> {
        let trip: TripRequest = require(context, StateKey::TripRequest).await?;
        let values = [
            ("city_name", trip.city.clone()),
            ("currency", context.config.currency.clone()),
            ("num_days", trip.num_days.to_string()),
            ("flight_info", dataset_text(context, StateKey::Flights).await),
            ("hotel_info", dataset_text(context, StateKey::Hotels).await),
            ("transport_info", dataset_text(context, StateKey::Transport).await),
            ("restaurant_info", dataset_text(context, StateKey::Restaurants).await),
            ("attraction_info", dataset_text(context, StateKey::Attractions).await),
        ];
        Ok(render_template(EXPENSE_USER_TEMPLATE, &values))
    }
}

#[async_trait]
impl PipelineStage for ExpenseStage {
    type Output = String;

    fn stage_name(&self) -> &'static str {
        "expense"
    }

    fn output_key(&self) -> StateKey {
        StateKey::Expenses
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig::requires(&[
            StateKey::TripRequest,
            StateKey::Flights,
            StateKey::Hotels,
            StateKey::Transport,
            StateKey::Restaurants,
            StateKey::Attractions,
        ])
    }

    async fn run(&self, context: &PlannerContext) -> Result<String> {
        let user_prompt = self.build_prompt(context).await?;
        Ok(complete_or_fallback(
            context,
            self.stage_name(),
            EXPENSE_SYSTEM_PROMPT,
            &user_prompt,
            EXPENSE_FALLBACK,
        )
        .await)
    }
}
