use serde::{Deserialize, Serialize};

use crate::types::trip::Coordinates;

const UNKNOWN_NAME: &str = "Unknown";
const NOT_AVAILABLE: &str = "Not available";

/// SerpAPI `google_maps` 搜索返回的 `local_results` 条目
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LocalResult {
    pub title: Option<String>,
    pub address: Option<String>,
    pub price: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
    pub link: Option<String>,
    pub gps_coordinates: Option<Coordinates>,
}

/// 酒店信息
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Hotel {
    pub name: String,
    pub address: String,
    pub price_range: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
    pub link: String,
}

impl From<LocalResult> for Hotel {
    fn from(result: LocalResult) -> Self {
        Self {
            name: result.title.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            address: result.address.unwrap_or_default(),
            price_range: result.price.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            kind: result.kind.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            rating: result.rating,
            reviews: result.reviews,
            link: result.link.unwrap_or_default(),
        }
    }
}

/// 餐厅信息
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Restaurant {
    pub name: String,
    pub address: String,
    pub avg_meal_price: String,
    pub meals_available: String,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
    pub link: String,
}

impl From<LocalResult> for Restaurant {
    fn from(result: LocalResult) -> Self {
        Self {
            name: result.title.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            address: result.address.unwrap_or_default(),
            avg_meal_price: result.price.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            meals_available: result.kind.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            rating: result.rating,
            reviews: result.reviews,
            link: result.link.unwrap_or_default(),
        }
    }
}

/// 交通站点或线路建议
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransportOption {
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
    pub coordinates: Option<Coordinates>,
}

impl From<LocalResult> for TransportOption {
    fn from(result: LocalResult) -> Self {
        Self {
            name: result.title.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            address: result.address.unwrap_or_default(),
            kind: result.kind.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            rating: result.rating,
            reviews: result.reviews,
            coordinates: result.gps_coordinates,
        }
    }
}

/// 截取前K条结果，保持上游顺序
pub fn take_top_k<T, U>(results: Vec<T>, topk: usize) -> Vec<U>
where
    U: From<T>,
{
    results.into_iter().take(topk).map(U::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_result(title: &str) -> LocalResult {
        LocalResult {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_hotel_defaults() {
        let hotel = Hotel::from(LocalResult::default());
        assert_eq!(hotel.name, "Unknown");
        assert_eq!(hotel.address, "");
        assert_eq!(hotel.price_range, "Not available");
        assert_eq!(hotel.kind, "Not available");
        assert_eq!(hotel.rating, None);
        assert_eq!(hotel.link, "");
    }

    #[test]
    fn test_restaurant_maps_fields() {
        let result = LocalResult {
            title: Some("Paradise Biryani".to_string()),
            address: Some("Secunderabad".to_string()),
            price: Some("₹200–400".to_string()),
            kind: Some("Biryani restaurant".to_string()),
            rating: Some(4.1),
            reviews: Some(52013),
            link: Some("https://example.com".to_string()),
            gps_coordinates: None,
        };
        let restaurant = Restaurant::from(result);
        assert_eq!(restaurant.name, "Paradise Biryani");
        assert_eq!(restaurant.avg_meal_price, "₹200–400");
        assert_eq!(restaurant.meals_available, "Biryani restaurant");
        assert_eq!(restaurant.reviews, Some(52013));
    }

    #[test]
    fn test_take_top_k_caps_and_preserves_order() {
        let results: Vec<LocalResult> = ["a", "b", "c", "d", "e", "f"]
            .iter()
            .map(|t| local_result(t))
            .collect();

        let hotels: Vec<Hotel> = take_top_k(results.clone(), 3);
        let names: Vec<_> = hotels.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let all: Vec<Hotel> = take_top_k(results.clone(), 100);
        assert_eq!(all.len(), 6);

        let none: Vec<Hotel> = take_top_k(results, 0);
        assert!(none.is_empty());
    }

    #[test]
    fn test_local_result_deserializes_serpapi_shape() {
        let value = serde_json::json!({
            "position": 1,
            "title": "Miyapur Metro Station",
            "type": "Transit station",
            "gps_coordinates": {"latitude": 17.49, "longitude": 78.37},
            "rating": 4.3,
            "reviews": 1200
        });
        let result: LocalResult = serde_json::from_value(value).unwrap();
        let option = TransportOption::from(result);
        assert_eq!(option.kind, "Transit station");
        assert_eq!(option.coordinates.unwrap().latitude, 17.49);
    }
}
