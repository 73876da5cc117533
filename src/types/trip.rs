use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 默认的包围盒半宽（度），约等于27km
pub const DEFAULT_BOUNDING_BOX_DELTA: f64 = 0.25;

/// 用户输入的行程请求
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripRequest {
    /// 目的地城市名称，用于地理编码以及酒店、餐厅检索
    pub city: String,
    /// 出发机场代码
    pub origin_city: String,
    /// 到达机场代码
    pub destination_city: String,
    /// 去程日期
    pub outbound_date: NaiveDate,
    /// 返程日期
    pub return_date: Option<NaiveDate>,
    /// 行程天数
    pub num_days: u32,
}

impl TripRequest {
    /// 校验行程请求
    pub fn validate(&self) -> Result<()> {
        if self.city.trim().is_empty() {
            bail!("城市名称不能为空");
        }
        if self.origin_city.trim().is_empty() || self.destination_city.trim().is_empty() {
            bail!("出发与到达机场代码不能为空");
        }
        if self.num_days == 0 {
            bail!("行程天数必须大于0");
        }
        if let Some(return_date) = self.return_date
            && return_date < self.outbound_date
        {
            bail!(
                "返程日期 {} 早于去程日期 {}",
                return_date,
                self.outbound_date
            );
        }
        Ok(())
    }

    /// 解析 `YYYY-MM-DD` 格式的日期
    pub fn parse_date(value: &str) -> Result<NaiveDate> {
        match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
            Ok(date) => Ok(date),
            Err(e) => bail!("无法解析日期 '{}'，应为 YYYY-MM-DD 格式: {}", value, e),
        }
    }
}

/// 经纬度坐标
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// 以某点为中心的矩形区域，字段顺序与Geoapify的 `rect:` 过滤器一致
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lon1: f64,
    pub lat1: f64,
    pub lon2: f64,
    pub lat2: f64,
}

impl BoundingBox {
    /// 生成Geoapify的 `rect:lon1,lat1,lon2,lat2` 过滤表达式
    pub fn to_rect_filter(&self) -> String {
        format!("rect:{},{},{},{}", self.lon1, self.lat1, self.lon2, self.lat2)
    }
}

/// 计算包围盒，返回 (lon - delta, lat + delta, lon + delta, lat - delta)
pub fn bounding_box(latitude: f64, longitude: f64, delta: f64) -> BoundingBox {
    BoundingBox {
        lon1: longitude - delta,
        lat1: latitude + delta,
        lon2: longitude + delta,
        lat2: latitude - delta,
    }
}

/// 地理编码后的目的地信息
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Destination {
    pub latitude: f64,
    pub longitude: f64,
    pub bounding_box: BoundingBox,
}

impl Destination {
    pub fn new(coordinates: Coordinates, delta: f64) -> Self {
        Self {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            bounding_box: bounding_box(coordinates.latitude, coordinates.longitude, delta),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
