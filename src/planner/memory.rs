use std::fmt::{Display, Formatter};

pub struct MemoryScope;

impl MemoryScope {
    /// 行程数据
    pub const TRIP: &'static str = "trip";
    /// 各阶段耗时（秒）
    pub const TIMING: &'static str = "timing";
}

/// 共享记录中的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    TripRequest,
    Destination,
    Weather,
    Hotels,
    Flights,
    Transport,
    NearbyTransport,
    Restaurants,
    Attractions,
    Expenses,
    FinalReport,
}

impl StateKey {
    pub const ALL: [StateKey; 11] = [
        StateKey::TripRequest,
        StateKey::Destination,
        StateKey::Weather,
        StateKey::Hotels,
        StateKey::Flights,
        StateKey::Transport,
        StateKey::NearbyTransport,
        StateKey::Restaurants,
        StateKey::Attractions,
        StateKey::Expenses,
        StateKey::FinalReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::TripRequest => "trip_request",
            StateKey::Destination => "destination",
            StateKey::Weather => "weather",
            StateKey::Hotels => "hotels",
            StateKey::Flights => "flights",
            StateKey::Transport => "transport",
            StateKey::NearbyTransport => "nearby_transport",
            StateKey::Restaurants => "restaurants",
            StateKey::Attractions => "attractions",
            StateKey::Expenses => "expenses",
            StateKey::FinalReport => "final_report",
        }
    }
}

impl Display for StateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
