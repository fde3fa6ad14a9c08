//! Tidewater - multi-region coastal flood adaptation environment
//!
//! Each year the sea level and storm surge move according to Markov transition
//! tables, every region chooses whether to build protection, and the
//! environment reports the discounted monetary and carbon costs of flooding,
//! construction and upkeep. Regions draining into one another amplify each
//! other's flood losses when their critical floodwalls are missing.

pub mod core;
pub mod costs;
pub mod damage;
pub mod environment;
pub mod interaction;
pub mod protection;
pub mod water;

pub use crate::core::{
    Action, EnvironmentConfig, Result, SystemState, TidewaterError, WaterLevels, WaterState,
};
pub use costs::{CostBreakdown, CostModel, ProtectionSystem, SystemParams};
pub use environment::{FloodEnvironment, Observation, StepResult, VecEnvironment};
pub use water::TransitionTables;
