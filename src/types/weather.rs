use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::types::trip::Coordinates;

/// 将WMO天气代码转换为可读描述，不在表中的代码返回 `Unknown`
pub fn weather_description(weather_code: i64) -> &'static str {
    match weather_code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// 单日天气预报
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: String,
    pub max_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub average_temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub weather_description: String,
    pub weather_code: i64,
}

/// 预报期内的汇总信息
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct WeatherSummary {
    pub average_temp: f64,
    pub total_precipitation: f64,
    pub rainy_days: u32,
    pub sunny_days: u32,
}

/// 城市天气报告
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    pub coordinates: Coordinates,
    pub forecast_days: u32,
    pub daily_forecast: Vec<DailyForecast>,
    pub summary: WeatherSummary,
}

/// Open-Meteo `daily` 字段，每个数组按日期对齐
#[derive(Debug, Deserialize, Default)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub weathercode: Vec<Option<i64>>,
}

impl WeatherReport {
    /// 由Open-Meteo的逐日数据构建天气报告，最多取 `days` 天
    pub fn from_daily(
        city: &str,
        coordinates: Coordinates,
        days: u32,
        daily: &DailySeries,
    ) -> Self {
        let mut daily_forecast = Vec::new();
        let mut summary = WeatherSummary::default();
        let mut total_temp = 0.0;
        let mut temp_samples = 0u32;

        for (i, date) in daily.time.iter().take(days as usize).enumerate() {
            let max_temperature = daily.temperature_2m_max.get(i).copied().flatten();
            let min_temperature = daily.temperature_2m_min.get(i).copied().flatten();
            let precipitation = daily.precipitation_sum.get(i).copied().flatten();
            let weather_code = daily.weathercode.get(i).copied().flatten().unwrap_or(0);

            let average_temperature = match (max_temperature, min_temperature) {
                (Some(max), Some(min)) => Some((max + min) / 2.0),
                _ => None,
            };
            if let Some(avg) = average_temperature {
                total_temp += avg;
                temp_samples += 1;
            }

            if let Some(precip) = precipitation {
                summary.total_precipitation += precip;
                if precip > 0.0 {
                    summary.rainy_days += 1;
                }
            }
            // 0、1 视为晴天
            if weather_code <= 1 {
                summary.sunny_days += 1;
            }

            daily_forecast.push(DailyForecast {
                date: date.clone(),
                max_temperature,
                min_temperature,
                average_temperature,
                precipitation,
                weather_description: weather_description(weather_code).to_string(),
                weather_code,
            });
        }

        if temp_samples > 0 {
            summary.average_temp = total_temp / temp_samples as f64;
        }

        Self {
            city: city.to_string(),
            coordinates,
            forecast_days: days,
            daily_forecast,
            summary,
        }
    }
}

fn format_temperature(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}°C", v))
        .unwrap_or_else(|| "N/A".to_string())
}

impl Display for WeatherReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "WEATHER REPORT FOR {}", self.city.to_uppercase())?;
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "Coordinates: {:.4}, {:.4}",
            self.coordinates.latitude, self.coordinates.longitude
        )?;
        writeln!(f, "Forecast Period: {} days", self.forecast_days)?;
        writeln!(f)?;
        writeln!(f, "SUMMARY:")?;
        writeln!(f, "  Average Temperature: {:.1}°C", self.summary.average_temp)?;
        writeln!(
            f,
            "  Total Precipitation: {:.1}mm",
            self.summary.total_precipitation
        )?;
        writeln!(f)?;
        writeln!(f, "DAILY FORECAST:")?;
        writeln!(
            f,
            "{:<12} {:<10} {:<10} {:<10} {:<20}",
            "Date", "Max", "Min", "Avg", "Weather"
        )?;
        writeln!(f, "{}", "-".repeat(60))?;
        for day in &self.daily_forecast {
            let weather: String = day.weather_description.chars().take(18).collect();
            writeln!(
                f,
                "{:<12} {:<10} {:<10} {:<10} {:<20}",
                day.date,
                format_temperature(day.max_temperature),
                format_temperature(day.min_temperature),
                format_temperature(day.average_temperature),
                weather
            )?;
        }
        write!(f, "{}", rule)
    }
}
