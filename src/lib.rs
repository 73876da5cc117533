pub mod cli;
pub mod config;
pub mod i18n;
pub mod llm;
pub mod memory;
pub mod planner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use planner::launch;
