use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::planner::context::PlannerContext;
use crate::planner::memory::StateKey;
use crate::planner::stage::{PipelineStage, StageDataConfig, require};
use crate::types::trip::{Destination, TripRequest};

/// 解析目的地坐标并计算包围盒，是流水线中唯一会中断执行的阶段
pub struct GeocodeStage;

#[async_trait]
impl PipelineStage for GeocodeStage {
    type Output = Destination;

    fn stage_name(&self) -> &'static str {
        "geocode"
    }

    fn output_key(&self) -> StateKey {
        StateKey::Destination
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig::requires(&[StateKey::TripRequest])
    }

    async fn run(&self, context: &PlannerContext) -> Result<Destination> {
        let trip: TripRequest = require(context, StateKey::TripRequest).await?;
        let coordinates = context
            .services
            .open_meteo
            .geocode_city(&trip.city)
            .await
            .ok_or_else(|| anyhow!("无法获取城市 '{}' 的坐标，流程终止", trip.city))?;

        Ok(Destination::new(
            coordinates,
            context.config.search.bounding_box_delta,
        ))
    }
}
