use anyhow::Result;
use async_trait::async_trait;

use crate::planner::context::PlannerContext;
use crate::planner::memory::StateKey;
use crate::planner::stage::{PipelineStage, StageDataConfig, require};
use crate::types::trip::{Destination, TripRequest};
use crate::types::weather::WeatherReport;

pub struct WeatherStage;

#[async_trait]
impl PipelineStage for WeatherStage {
    type Output = Option<WeatherReport>;

    fn stage_name(&self) -> &'static str {
        "weather"
    }

    fn output_key(&self) -> StateKey {
        StateKey::Weather
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig::requires(&[StateKey::TripRequest, StateKey::Destination])
    }

    async fn run(&self, context: &PlannerContext) -> Result<Option<WeatherReport>> {
        let trip: TripRequest = require(context, StateKey::TripRequest).await?;
        let destination: Destination = require(context, StateKey::Destination).await?;

        let report = context
            .services
            .open_meteo
            .weather_report(&trip.city, destination.coordinates(), trip.num_days)
            .await;
        if let Some(report) = &report {
            println!("{}", report);
        }
        Ok(report)
    }
}
