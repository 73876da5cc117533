use anyhow::Result;
use async_trait::async_trait;

use crate::planner::context::PlannerContext;
use crate::planner::memory::StateKey;
use crate::planner::stage::{PipelineStage, StageDataConfig, require};
use crate::types::attraction::AttractionSpot;
use crate::types::trip::Destination;

pub struct AttractionsStage;

#[async_trait]
impl PipelineStage for AttractionsStage {
    type Output = Vec<AttractionSpot>;

    fn stage_name(&self) -> &'static str {
        "attractions"
    }

    fn output_key(&self) -> StateKey {
        StateKey::Attractions
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig::requires(&[StateKey::Destination])
    }

    async fn run(&self, context: &PlannerContext) -> Result<Vec<AttractionSpot>> {
        let destination: Destination = require(context, StateKey::Destination).await?;
        Ok(context
            .services
            .geoapify
            .attraction_spots(&destination.bounding_box)
            .await)
    }
}
