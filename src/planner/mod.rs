pub mod context;
pub mod memory;
pub mod outlet;
pub mod prompts;
pub mod stage;
pub mod stages;
pub mod state;
pub mod workflow;

pub use context::PlannerContext;
pub use memory::StateKey;
pub use state::TravelState;
pub use workflow::{TravelPipeline, launch, run};
