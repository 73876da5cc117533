use anyhow::Result;
use async_trait::async_trait;

use crate::planner::context::PlannerContext;
use crate::planner::memory::StateKey;
use crate::planner::stage::{PipelineStage, StageDataConfig, require};
use crate::types::flight::FlightOffer;
use crate::types::trip::TripRequest;

pub struct FlightsStage;

#[async_trait]
impl PipelineStage for FlightsStage {
    type Output = Vec<FlightOffer>;

    fn stage_name(&self) -> &'static str {
        "flights"
    }

    fn output_key(&self) -> StateKey {
        StateKey::Flights
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig::requires(&[StateKey::TripRequest])
    }

    async fn run(&self, context: &PlannerContext) -> Result<Vec<FlightOffer>> {
        let trip: TripRequest = require(context, StateKey::TripRequest).await?;
        Ok(context
            .services
            .serpapi
            .search_flights(
                &trip.origin_city,
                &trip.destination_city,
                trip.outbound_date,
                trip.return_date,
                &context.config.currency,
            )
            .await)
    }
}
