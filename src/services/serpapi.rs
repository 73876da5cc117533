use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::{ProviderConfig, SearchConfig};
use crate::services::{ServiceError, get_json};
use crate::types::flight::{FlightOffer, FlightSearchResults};
use crate::types::listing::{Hotel, LocalResult, Restaurant, TransportOption, take_top_k};
use crate::types::trip::Coordinates;

const PROVIDER: &str = "serpapi";

#[derive(Debug, Deserialize)]
struct MapsResponse {
    #[serde(default)]
    local_results: Vec<LocalResult>,
}

/// SerpAPI 客户端，覆盖 Google Maps 与 Google Flights 两个引擎
#[derive(Clone)]
pub struct SerpApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    country: String,
    language: String,
    map_zoom: u8,
    timeout: Duration,
    flights_timeout: Duration,
    transport_timeout: Duration,
}

impl SerpApiClient {
    pub fn new(http: reqwest::Client, config: &ProviderConfig, search: &SearchConfig) -> Self {
        Self {
            http,
            base_url: config.serpapi_url.clone(),
            api_key: config.serpapi_key.clone(),
            country: config.country.clone(),
            language: config.language.clone(),
            map_zoom: search.map_zoom,
            timeout: Duration::from_secs(config.timeout_seconds),
            flights_timeout: Duration::from_secs(config.flights_timeout_seconds),
            transport_timeout: Duration::from_secs(config.transport_timeout_seconds),
        }
    }

    fn api_key(&self) -> Result<String, ServiceError> {
        if self.api_key.trim().is_empty() {
            return Err(ServiceError::MissingApiKey("SerpAPI"));
        }
        Ok(self.api_key.clone())
    }

    /// 地图检索的中心点参数，形如 `@17.385,78.4867,14z`
    pub fn map_center(&self, center: Coordinates) -> String {
        format!("@{},{},{}z", center.latitude, center.longitude, self.map_zoom)
    }

    async fn maps_search(
        &self,
        query: String,
        center: Option<Coordinates>,
        timeout: Duration,
    ) -> Result<Vec<LocalResult>, ServiceError> {
        let mut params = vec![
            ("engine", "google_maps".to_string()),
            ("type", "search".to_string()),
            ("q", query),
            ("hl", self.language.clone()),
            ("gl", self.country.clone()),
            ("api_key", self.api_key()?),
        ];
        if let Some(center) = center {
            params.push(("ll", self.map_center(center)));
        }

        let response: MapsResponse =
            get_json(&self.http, PROVIDER, &self.base_url, &params, timeout).await?;
        Ok(response.local_results)
    }

    /// 获取城市中排名靠前的酒店，最多 `topk` 条
    pub async fn top_hotels(&self, city_name: &str, topk: usize) -> Vec<Hotel> {
        let query = format!("hotels in area {}", city_name);
        match self.maps_search(query, None, self.timeout).await {
            Ok(results) => {
                let hotels: Vec<Hotel> = take_top_k(results, topk);
                info!(city = city_name, count = hotels.len(), "酒店检索完成");
                hotels
            }
            Err(e) => {
                warn!(city = city_name, error = %e, "获取酒店列表失败");
                Vec::new()
            }
        }
    }

    /// 获取城市中排名靠前的餐厅，最多 `topk` 条
    pub async fn top_restaurants(&self, city_name: &str, topk: usize) -> Vec<Restaurant> {
        let query = format!("restaurants in area {}", city_name);
        match self.maps_search(query, None, self.timeout).await {
            Ok(results) => {
                let restaurants: Vec<Restaurant> = take_top_k(results, topk);
                info!(city = city_name, count = restaurants.len(), "餐厅检索完成");
                restaurants
            }
            Err(e) => {
                warn!(city = city_name, error = %e, "获取餐厅列表失败");
                Vec::new()
            }
        }
    }

    async fn try_search_flights(
        &self,
        origin: &str,
        destination: &str,
        outbound_date: NaiveDate,
        return_date: Option<NaiveDate>,
        currency: &str,
    ) -> Result<Vec<FlightOffer>, ServiceError> {
        let mut params = vec![
            ("engine", "google_flights".to_string()),
            ("hl", self.language.clone()),
            ("gl", self.country.clone()),
            ("departure_id", origin.trim().to_uppercase()),
            ("arrival_id", destination.trim().to_uppercase()),
            ("outbound_date", outbound_date.format("%Y-%m-%d").to_string()),
            ("currency", currency.to_string()),
            ("api_key", self.api_key()?),
        ];
        match return_date {
            Some(date) => params.push(("return_date", date.format("%Y-%m-%d").to_string())),
            // Google Flights: 1 往返，2 单程
            None => params.push(("type", "2".to_string())),
        }

        let results: FlightSearchResults = get_json(
            &self.http,
            PROVIDER,
            &self.base_url,
            &params,
            self.flights_timeout,
        )
        .await?;
        Ok(results.into_offers())
    }

    /// 检索航班，返回 best_flights 与 other_flights 的合并列表
    pub async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        outbound_date: NaiveDate,
        return_date: Option<NaiveDate>,
        currency: &str,
    ) -> Vec<FlightOffer> {
        info!(origin, destination, "检索航班");
        match self
            .try_search_flights(origin, destination, outbound_date, return_date, currency)
            .await
        {
            Ok(offers) => offers,
            Err(e) => {
                warn!(origin, destination, error = %e, "获取航班信息失败");
                Vec::new()
            }
        }
    }

    /// 检索两点之间的本地交通方案
    pub async fn local_transport(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: &str,
    ) -> Vec<TransportOption> {
        let center = Coordinates {
            latitude: (origin.latitude + destination.latitude) / 2.0,
            longitude: (origin.longitude + destination.longitude) / 2.0,
        };
        let query = format!(
            "local transport from {},{} to {},{} by {}",
            origin.latitude, origin.longitude, destination.latitude, destination.longitude, mode
        );

        match self
            .maps_search(query, Some(center), self.transport_timeout)
            .await
        {
            Ok(results) => results.into_iter().map(TransportOption::from).collect(),
            Err(e) => {
                warn!(mode, error = %e, "获取本地交通信息失败");
                Vec::new()
            }
        }
    }

    /// 检索某点附近的交通站点（如地铁站、公交站）
    pub async fn nearby_transport(
        &self,
        center: Coordinates,
        transport_type: &str,
    ) -> Vec<TransportOption> {
        match self
            .maps_search(transport_type.to_string(), Some(center), self.transport_timeout)
            .await
        {
            Ok(results) => results.into_iter().map(TransportOption::from).collect(),
            Err(e) => {
                warn!(transport_type, error = %e, "获取附近交通站点失败");
                Vec::new()
            }
        }
    }
}
