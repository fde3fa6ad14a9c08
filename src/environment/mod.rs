//! Episode orchestration: regions, water, coupling and rewards

pub mod env;
pub mod observation;
pub mod region;
pub mod vec_env;

pub use env::FloodEnvironment;
pub use observation::{Observation, RegionCosts, RegionStatus, StepInfo, StepResult};
pub use region::Region;
pub use vec_env::VecEnvironment;
