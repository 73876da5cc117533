use anyhow::Result;
use async_trait::async_trait;

use crate::planner::context::PlannerContext;
use crate::planner::memory::StateKey;
use crate::planner::stage::{PipelineStage, StageDataConfig, require};
use crate::types::listing::TransportOption;
use crate::types::trip::{Coordinates, Destination};

/// 包围盒两个角之间的本地交通方案
pub struct TransportStage;

#[async_trait]
impl PipelineStage for TransportStage {
    type Output = Vec<TransportOption>;

    fn stage_name(&self) -> &'static str {
        "transport"
    }

    fn output_key(&self) -> StateKey {
        StateKey::Transport
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig::requires(&[StateKey::Destination])
    }

    async fn run(&self, context: &PlannerContext) -> Result<Vec<TransportOption>> {
        let destination: Destination = require(context, StateKey::Destination).await?;
        let bbox = destination.bounding_box;
        let origin = Coordinates {
            latitude: bbox.lat1,
            longitude: bbox.lon1,
        };
        let target = Coordinates {
            latitude: bbox.lat2,
            longitude: bbox.lon2,
        };

        Ok(context
            .services
            .serpapi
            .local_transport(origin, target, &context.config.search.transport_mode)
            .await)
    }
}

/// 城市中心附近的交通站点，仅在配置开启时执行
pub struct NearbyTransportStage;

#[async_trait]
impl PipelineStage for NearbyTransportStage {
    type Output = Vec<TransportOption>;

    fn stage_name(&self) -> &'static str {
        "nearby_transport"
    }

    fn output_key(&self) -> StateKey {
        StateKey::NearbyTransport
    }

    fn data_config(&self) -> StageDataConfig {
        StageDataConfig::requires(&[StateKey::Destination])
    }

    async fn run(&self, context: &PlannerContext) -> Result<Vec<TransportOption>> {
        let destination: Destination = require(context, StateKey::Destination).await?;
        Ok(context
            .services
            .serpapi
            .nearby_transport(
                destination.coordinates(),
                &context.config.search.nearby_transport_type,
            )
            .await)
    }
}
