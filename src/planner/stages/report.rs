use anyhow::Result;
use async_trait::async_trait;

use crate::planner::context::PlannerContext;
use crate::planner::memory::StateKey;
use crate::planner::prompts::{
    REPORT_FALLBACK, REPORT_SYSTEM_PROMPT, REPORT_USER_TEMPLATE, render_template,
};
use crate::planner::stage::{PipelineStage, StageDataConfig, require};
use crate::planner::stages::{complete_or_fallback, dataset_text};
use crate::types::trip::TripRequest;

/// 汇总全部数据与费用估算，生成最终的旅行报告
pub struct FinalReportStage;

impl FinalReportStage {
    /// 交通部分：路线方案，外加（若有）附近站点
    async fn transport_text(&self, context: &PlannerContext) -> String {
        let routes = dataset_text(context, StateKey::Transport).await;
        if !context.has_memory_data(StateKey::NearbyTransport).await {
            return routes;
        }

        let stations = dataset_text(context, StateKey::NearbyTransport).await;
        format!(
            "{}\n\nNearby {} options around the city centre:\n{}",
            routes, context.config.search.nearby_transport_type, stations
        )
    }

    pub async fn build_prompt(&self, context: &PlannerContext) -> Result<String> {
        let trip: TripRequest = require(context, StateKey::TripRequest).await?;
        let expenses: String = require(context, StateKey::Expenses).await?;
        let return_date = trip
            .return_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "N/A (one-way)".to_string());

        let values = [
            ("origin_city", trip.origin_city.clone()),
            ("destination_city", trip.destination_city.clone()),
            ("num_days", trip.num_days.to_string()),
            ("outbound_date", trip.outbound_date.to_string()),
            ("return_date", return_date),
            ("flight_info", dataset_text(context, StateKey::Flights).await),
            ("weather_info", dataset_text(context, StateKey::Weather).await),
            ("attraction_info", dataset_text(context, StateKey::Attractions).await),
            ("restaurant_info", dataset_text(context, StateKey::Restaurants).await),
            ("hotel_info", dataset_text(context, StateKey::Hotels).await),
            ("transport_info", self.transport_text(context).await),
            ("expense_report_text", expenses),
            ("currency", context.config.currency.clone()),
        ];
        Ok(render_template(REPORT_USER_TEMPLATE, &values))
    }
}

#[async_trait]
impl PipelineStage for FinalReportStage {
    type Output = String;

    fn stage_name(&self) -> &'static str {
        "final_report"
    }

    fn output_key(&self) -> StateKey {
        StateKey::FinalReport
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig::requires(&[
            StateKey::TripRequest,
            StateKey::Flights,
            StateKey::Weather,
            StateKey::Attractions,
            StateKey::Restaurants,
            StateKey::Hotels,
            StateKey::Transport,
            StateKey::Expenses,
        ])
        .with_optional(&[StateKey::NearbyTransport])
    }

    async fn run(&self, context: &PlannerContext) -> Result<String> {
        let user_prompt = self.build_prompt(context).await?;
        Ok(complete_or_fallback(
            context,
            self.stage_name(),
            REPORT_SYSTEM_PROMPT,
            &user_prompt,
            REPORT_FALLBACK,
        )
        .await)
    }
}
