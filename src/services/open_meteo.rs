use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::ProviderConfig;
use crate::services::{ServiceError, get_json};
use crate::types::trip::Coordinates;
use crate::types::weather::{DailySeries, WeatherReport};

const PROVIDER: &str = "open-meteo";

/// Open-Meteo 单次预报支持的最大天数
pub const MAX_FORECAST_DAYS: u32 = 16;

const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min,precipitation_sum";

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Coordinates>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    daily: DailySeries,
}

/// Open-Meteo 地理编码与天气预报客户端
#[derive(Clone)]
pub struct OpenMeteoClient {
    http: reqwest::Client,
    geocoding_url: String,
    weather_url: String,
    timezone: String,
    timeout: Duration,
}

impl OpenMeteoClient {
    pub fn new(http: reqwest::Client, config: &ProviderConfig) -> Self {
        Self {
            http,
            geocoding_url: config.geocoding_url.clone(),
            weather_url: config.weather_url.clone(),
            timezone: config.weather_timezone.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    async fn try_geocode(&self, city_name: &str) -> Result<Coordinates, ServiceError> {
        let query = [
            ("name", city_name.to_string()),
            ("count", "1".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];
        let response: GeocodingResponse =
            get_json(&self.http, PROVIDER, &self.geocoding_url, &query, self.timeout).await?;

        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound(city_name.to_string()))
    }

    /// 将城市名解析为经纬度，找不到或请求失败时返回None
    pub async fn geocode_city(&self, city_name: &str) -> Option<Coordinates> {
        match self.try_geocode(city_name).await {
            Ok(coordinates) => {
                info!(
                    city = city_name,
                    latitude = coordinates.latitude,
                    longitude = coordinates.longitude,
                    "地理编码完成"
                );
                Some(coordinates)
            }
            Err(e) => {
                warn!(city = city_name, error = %e, "获取城市坐标失败");
                None
            }
        }
    }

    async fn try_forecast(
        &self,
        coordinates: Coordinates,
        days: u32,
    ) -> Result<DailySeries, ServiceError> {
        let query = [
            ("latitude", coordinates.latitude.to_string()),
            ("longitude", coordinates.longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", self.timezone.clone()),
            ("forecast_days", days.to_string()),
        ];
        let response: ForecastResponse =
            get_json(&self.http, PROVIDER, &self.weather_url, &query, self.timeout).await?;
        Ok(response.daily)
    }

    /// 获取指定坐标未来若干天的天气报告，天数会被限制在 1..=16
    pub async fn weather_report(
        &self,
        city_name: &str,
        coordinates: Coordinates,
        days: u32,
    ) -> Option<WeatherReport> {
        let days = days.clamp(1, MAX_FORECAST_DAYS);
        match self.try_forecast(coordinates, days).await {
            Ok(daily) => Some(WeatherReport::from_daily(city_name, coordinates, days, &daily)),
            Err(e) => {
                warn!(city = city_name, error = %e, "获取天气数据失败");
                None
            }
        }
    }
}
