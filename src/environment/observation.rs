//! What `reset` and `step` hand back to the caller

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{SystemState, WaterState};
use crate::costs::CostBreakdown;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStatus {
    pub name: String,
    pub state: SystemState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub water_state: WaterState,
    /// One entry per region, in action order
    pub system_states: Vec<RegionStatus>,
}

impl Observation {
    pub fn state_of(&self, name: &str) -> Option<SystemState> {
        self.system_states
            .iter()
            .find(|status| status.name == name)
            .map(|status| status.state)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionCosts {
    pub name: String,
    pub costs: CostBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Discounted, interaction-adjusted breakdowns, in action order
    pub costs: Vec<RegionCosts>,
    /// Year counter after the step
    pub year: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

impl StepResult {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
