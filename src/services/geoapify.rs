use std::time::Duration;

use tracing::{info, warn};

use crate::config::{ProviderConfig, SearchConfig};
use crate::services::{ServiceError, get_json};
use crate::types::attraction::{AttractionSpot, PlacesResponse};
use crate::types::listing::take_top_k;
use crate::types::trip::BoundingBox;

const PROVIDER: &str = "geoapify";

/// Geoapify Places 景点检索客户端
#[derive(Clone)]
pub struct GeoapifyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    categories: String,
    limit: usize,
    language: String,
    timeout: Duration,
}

impl GeoapifyClient {
    pub fn new(http: reqwest::Client, config: &ProviderConfig, search: &SearchConfig) -> Self {
        Self {
            http,
            base_url: config.geoapify_url.clone(),
            api_key: config.geoapify_key.clone(),
            categories: search.attraction_categories.clone(),
            limit: search.attraction_limit,
            language: config.language.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    async fn try_attraction_spots(
        &self,
        bounding_box: &BoundingBox,
    ) -> Result<Vec<AttractionSpot>, ServiceError> {
        if self.api_key.trim().is_empty() {
            return Err(ServiceError::MissingApiKey("Geoapify"));
        }

        let query = [
            ("filter", bounding_box.to_rect_filter()),
            ("categories", self.categories.clone()),
            ("limit", self.limit.to_string()),
            ("lang", self.language.clone()),
            ("apiKey", self.api_key.clone()),
        ];
        let response: PlacesResponse =
            get_json(&self.http, PROVIDER, &self.base_url, &query, self.timeout).await?;

        // 上游不一定遵守limit
        Ok(take_top_k(response.features, self.limit))
    }

    /// 检索包围盒范围内的景点
    pub async fn attraction_spots(&self, bounding_box: &BoundingBox) -> Vec<AttractionSpot> {
        match self.try_attraction_spots(bounding_box).await {
            Ok(spots) => {
                info!(count = spots.len(), "景点检索完成");
                spots
            }
            Err(e) => {
                warn!(error = %e, "获取景点信息失败");
                Vec::new()
            }
        }
    }
}
