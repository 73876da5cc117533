use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::planner::context::PlannerContext;
use crate::planner::memory::StateKey;
use crate::types::attraction::AttractionSpot;
use crate::types::flight::FlightOffer;
use crate::types::listing::{Hotel, Restaurant, TransportOption};
use crate::types::trip::{Destination, TripRequest};
use crate::types::weather::WeatherReport;

/// 流水线结束时共享记录的类型化快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelState {
    pub trip_request: TripRequest,
    pub destination: Option<Destination>,
    pub weather: Option<WeatherReport>,
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(default)]
    pub flights: Vec<FlightOffer>,
    #[serde(default)]
    pub transport: Vec<TransportOption>,
    /// 未开启附近站点检索时为None
    pub nearby_transport: Option<Vec<TransportOption>>,
    #[serde(default)]
    pub restaurants: Vec<Restaurant>,
    #[serde(default)]
    pub attractions: Vec<AttractionSpot>,
    pub expenses: Option<String>,
    pub final_report: Option<String>,
}

impl TravelState {
    /// 从共享记录收集快照
    pub async fn collect(context: &PlannerContext) -> Result<Self> {
        let trip_request = context
            .get_from_memory(StateKey::TripRequest)
            .await
            .ok_or_else(|| anyhow!("共享记录中缺少行程请求"))?;

        Ok(Self {
            trip_request,
            destination: context.get_from_memory(StateKey::Destination).await,
            weather: context
                .get_from_memory::<Option<WeatherReport>>(StateKey::Weather)
                .await
                .flatten(),
            hotels: context
                .get_from_memory(StateKey::Hotels)
                .await
                .unwrap_or_default(),
            flights: context
                .get_from_memory(StateKey::Flights)
                .await
                .unwrap_or_default(),
            transport: context
                .get_from_memory(StateKey::Transport)
                .await
                .unwrap_or_default(),
            nearby_transport: context.get_from_memory(StateKey::NearbyTransport).await,
            restaurants: context
                .get_from_memory(StateKey::Restaurants)
                .await
                .unwrap_or_default(),
            attractions: context
                .get_from_memory(StateKey::Attractions)
                .await
                .unwrap_or_default(),
            expenses: context.get_from_memory(StateKey::Expenses).await,
            final_report: context.get_from_memory(StateKey::FinalReport).await,
        })
    }
}
