use anyhow::Result;
use async_trait::async_trait;

use crate::planner::context::PlannerContext;
use crate::planner::memory::StateKey;
use crate::planner::stage::{PipelineStage, StageDataConfig, require};
use crate::types::listing::{Hotel, Restaurant};
use crate::types::trip::TripRequest;

/// 城市内排名靠前的酒店
pub struct HotelsStage;

#[async_trait]
impl PipelineStage for HotelsStage {
    type Output = Vec<Hotel>;

    fn stage_name(&self) -> &'static str {
        "hotels"
    }

    fn output_key(&self) -> StateKey {
        StateKey::Hotels
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig::requires(&[StateKey::TripRequest])
    }

    async fn run(&self, context: &PlannerContext) -> Result<Vec<Hotel>> {
        let trip: TripRequest = require(context, StateKey::TripRequest).await?;
        Ok(context
            .services
            .serpapi
            .top_hotels(&trip.city, context.config.search.hotel_limit)
            .await)
    }
}

/// 城市内排名靠前的餐厅
pub struct RestaurantsStage;

#[async_trait]
impl PipelineStage for RestaurantsStage {
    type Output = Vec<Restaurant>;

    fn stage_name(&self) -> &'static str {
        "restaurants"
    }

    fn output_key(&self) -> StateKey {
        StateKey::Restaurants
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig::requires(&[StateKey::TripRequest])
    }

    async fn run(&self, context: &PlannerContext) -> Result<Vec<Restaurant>> {
        let trip: TripRequest = require(context, StateKey::TripRequest).await?;
        Ok(context
            .services
            .serpapi
            .top_restaurants(&trip.city, context.config.search.restaurant_limit)
            .await)
    }
}
