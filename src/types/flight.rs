use serde::{Deserialize, Serialize};

/// 航班报价来源分组
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OfferTier {
    /// 对应 `best_flights`
    Best,
    /// 对应 `other_flights`
    #[default]
    Other,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Airport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

/// 单个航段
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct FlightSegment {
    #[serde(default)]
    pub departure_airport: Airport,
    #[serde(default)]
    pub arrival_airport: Airport,
    /// 分钟
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub travel_class: Option<String>,
    #[serde(default)]
    pub airplane: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Layover {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
}

/// Google Flights 航班报价
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct FlightOffer {
    #[serde(default)]
    pub tier: OfferTier,
    #[serde(default)]
    pub flights: Vec<FlightSegment>,
    #[serde(default)]
    pub layovers: Vec<Layover>,
    /// 分钟
    #[serde(default)]
    pub total_duration: Option<u64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, rename = "type")]
    pub trip_type: Option<String>,
    #[serde(default)]
    pub booking_token: Option<String>,
}

/// SerpAPI `google_flights` 响应中关心的部分
#[derive(Debug, Deserialize, Default)]
pub struct FlightSearchResults {
    #[serde(default)]
    pub best_flights: Vec<FlightOffer>,
    #[serde(default)]
    pub other_flights: Vec<FlightOffer>,
}

impl FlightSearchResults {
    /// 合并为一个列表：best在前，other在后，各自保持上游顺序
    pub fn into_offers(self) -> Vec<FlightOffer> {
        let tagged = |tier: OfferTier| {
            move |mut offer: FlightOffer| {
                offer.tier = tier;
                offer
            }
        };
        self.best_flights
            .into_iter()
            .map(tagged(OfferTier::Best))
            .chain(self.other_flights.into_iter().map(tagged(OfferTier::Other)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_offers_keeps_best_first() {
        let results: FlightSearchResults = serde_json::from_value(serde_json::json!({
            "best_flights": [
                {"price": 5200, "total_duration": 130, "type": "Round trip"},
                {"price": 5600}
            ],
            "other_flights": [
                {"price": 4100, "flights": [{
                    "departure_airport": {"name": "Indira Gandhi International Airport", "id": "DEL", "time": "2025-07-09 06:00"},
                    "arrival_airport": {"name": "Rajiv Gandhi International Airport", "id": "HYD", "time": "2025-07-09 08:10"},
                    "duration": 130,
                    "airline": "IndiGo",
                    "flight_number": "6E 2011"
                }]}
            ]
        }))
        .unwrap();

        let offers = results.into_offers();
        assert_eq!(offers.len(), 3);
        assert_eq!(offers[0].tier, OfferTier::Best);
        assert_eq!(offers[0].price, Some(5200.0));
        assert_eq!(offers[0].trip_type.as_deref(), Some("Round trip"));
        assert_eq!(offers[1].tier, OfferTier::Best);
        assert_eq!(offers[2].tier, OfferTier::Other);
        assert_eq!(offers[2].flights[0].airline.as_deref(), Some("IndiGo"));
        assert_eq!(offers[2].flights[0].departure_airport.id.as_deref(), Some("DEL"));
    }

    #[test]
    fn test_missing_sections_yield_empty() {
        let results: FlightSearchResults =
            serde_json::from_value(serde_json::json!({"search_metadata": {}})).unwrap();
        assert!(results.into_offers().is_empty());
    }
}
