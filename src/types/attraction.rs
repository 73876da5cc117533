use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 景点信息
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AttractionSpot {
    pub name: String,
    pub address: String,
    pub categories: Vec<String>,
    pub opening_hours: String,
    pub website: String,
    pub contacts: Option<Value>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub place_id: String,
}

/// Geoapify Places 返回的 GeoJSON FeatureCollection
#[derive(Debug, Deserialize, Default)]
pub struct PlacesResponse {
    #[serde(default)]
    pub features: Vec<PlaceFeature>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlaceFeature {
    #[serde(default)]
    pub properties: PlaceProperties,
    #[serde(default)]
    pub geometry: Option<PlaceGeometry>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlaceProperties {
    pub name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub opening_hours: Option<String>,
    pub website: Option<String>,
    pub contact: Option<Value>,
    pub place_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlaceGeometry {
    /// GeoJSON 顺序为 [lon, lat]
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// 拼接两行地址，去掉首尾多余的逗号和空格
fn join_address(line1: Option<&str>, line2: Option<&str>) -> String {
    format!("{}, {}", line1.unwrap_or(""), line2.unwrap_or(""))
        .trim_matches(|c| c == ',' || c == ' ')
        .to_string()
}

impl From<PlaceFeature> for AttractionSpot {
    fn from(feature: PlaceFeature) -> Self {
        let prop = feature.properties;
        let coordinates = feature.geometry.map(|g| g.coordinates).unwrap_or_default();

        Self {
            name: prop
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            address: join_address(prop.address_line1.as_deref(), prop.address_line2.as_deref()),
            categories: prop.categories,
            opening_hours: prop
                .opening_hours
                .unwrap_or_else(|| "Not available".to_string()),
            website: prop.website.unwrap_or_default(),
            contacts: prop.contact,
            lat: coordinates.get(1).copied(),
            lon: coordinates.first().copied(),
            place_id: prop.place_id.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_address_trims_separators() {
        assert_eq!(join_address(Some("Charminar"), Some("Hyderabad")), "Charminar, Hyderabad");
        assert_eq!(join_address(Some("Charminar"), None), "Charminar");
        assert_eq!(join_address(None, Some("Hyderabad")), "Hyderabad");
        assert_eq!(join_address(None, None), "");
    }

    #[test]
    fn test_feature_conversion() {
        let response: PlacesResponse = serde_json::from_value(serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {
                        "name": "Golconda Fort",
                        "address_line1": "Golconda Fort",
                        "address_line2": "Ibrahim Bagh, Hyderabad",
                        "categories": ["tourism", "tourism.sights"],
                        "website": "https://example.org",
                        "place_id": "abc123"
                    },
                    "geometry": {"type": "Point", "coordinates": [78.4011, 17.3833]}
                },
                {
                    "type": "Feature",
                    "properties": {"name": ""}
                }
            ]
        }))
        .unwrap();

        let spots: Vec<AttractionSpot> = response.features.into_iter().map(Into::into).collect();
        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].name, "Golconda Fort");
        assert_eq!(spots[0].address, "Golconda Fort, Ibrahim Bagh, Hyderabad");
        assert_eq!(spots[0].lat, Some(17.3833));
        assert_eq!(spots[0].lon, Some(78.4011));
        assert_eq!(spots[0].opening_hours, "Not available");
        assert_eq!(spots[1].name, "Unknown");
        assert_eq!(spots[1].lat, None);
        assert_eq!(spots[1].address, "");
    }
}
