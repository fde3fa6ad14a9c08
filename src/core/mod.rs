pub mod config;
pub mod error;
pub mod types;

pub use config::{EnvironmentConfig, RegionConfig, UnitScale};
pub use error::{Result, TidewaterError};
pub use types::{Action, Band, SystemState, WaterLevels, WaterState};
