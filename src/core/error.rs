use thiserror::Error;

#[derive(Error, Debug)]
pub enum TidewaterError {
    #[error("Invalid action {value} for region '{region}' (expected 0, 1 or 2)")]
    InvalidAction { region: String, value: u8 },

    #[error("Invalid system state: {0} (expected 0..=3)")]
    InvalidSystemState(u8),

    #[error("Malformed transition data: {0}")]
    MalformedTransition(String),

    #[error("Horizon exceeded: step called at year {year} after the episode ended (horizon {horizon})")]
    HorizonExceeded { year: u32, horizon: u32 },

    #[error("Expected {expected} actions (one per region), got {got}")]
    ActionCountMismatch { expected: usize, got: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TidewaterError>;
