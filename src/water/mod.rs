//! Sea-level rise and storm-surge state
//!
//! Transition tables come from an external Markov-chain fit; this module
//! validates them and samples the yearly water state from them.

pub mod process;
pub mod tables;

pub use process::WaterLevelProcess;
pub use tables::{TransitionTables, PROBABILITY_TOLERANCE};
