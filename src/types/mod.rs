pub mod attraction;
pub mod flight;
pub mod listing;
pub mod trip;
pub mod weather;
