//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

use crate::core::error::TidewaterError;

/// Protection action a policy chooses for one region in one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Action {
    /// Keep the current configuration
    DoNothing = 0,
    /// Build the lower or nature-based measure (F1, green space, marsh, reef)
    BuildLower = 1,
    /// Build the higher measure (the critical floodwall)
    BuildHigher = 2,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::DoNothing, Action::BuildLower, Action::BuildHigher];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_build(self) -> bool {
        self != Action::DoNothing
    }
}

impl TryFrom<u8> for Action {
    type Error = TidewaterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::DoNothing),
            1 => Ok(Action::BuildLower),
            2 => Ok(Action::BuildHigher),
            _ => Err(TidewaterError::InvalidAction {
                region: String::new(),
                value,
            }),
        }
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> u8 {
        action as u8
    }
}

/// Protection configuration of a region
///
/// The lower measure is F1 for two-floodwall regions and the nature-based
/// element elsewhere; the higher measure is always the critical floodwall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum SystemState {
    #[default]
    Unprotected = 0,
    LowerOnly = 1,
    HigherOnly = 2,
    Both = 3,
}

impl SystemState {
    pub const ALL: [SystemState; 4] = [
        SystemState::Unprotected,
        SystemState::LowerOnly,
        SystemState::HigherOnly,
        SystemState::Both,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether the lower / nature-based measure is present
    pub fn has_lower(self) -> bool {
        matches!(self, SystemState::LowerOnly | SystemState::Both)
    }

    /// Whether the critical (higher) floodwall is present
    pub fn has_higher(self) -> bool {
        matches!(self, SystemState::HigherOnly | SystemState::Both)
    }
}

impl TryFrom<u8> for SystemState {
    type Error = TidewaterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SystemState::Unprotected),
            1 => Ok(SystemState::LowerOnly),
            2 => Ok(SystemState::HigherOnly),
            3 => Ok(SystemState::Both),
            _ => Err(TidewaterError::InvalidSystemState(value)),
        }
    }
}

impl From<SystemState> for u8 {
    fn from(state: SystemState) -> u8 {
        state as u8
    }
}

/// Discretized water-level state (bin indices, not meters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaterState {
    pub slr_index: usize,
    pub surge_index: usize,
}

impl WaterState {
    pub fn new(slr_index: usize, surge_index: usize) -> Self {
        Self {
            slr_index,
            surge_index,
        }
    }
}

/// Water levels in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WaterLevels {
    pub slr_m: f64,
    pub surge_m: f64,
}

impl WaterLevels {
    pub fn new(slr_m: f64, surge_m: f64) -> Self {
        Self { slr_m, surge_m }
    }

    /// Water levels carrying the whole height as surge
    pub fn surge_only(height_m: f64) -> Self {
        Self::new(0.0, height_m)
    }

    pub fn total(&self) -> f64 {
        self.slr_m + self.surge_m
    }
}

/// Elevation interval `[base, top]` of a protection element, meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub base: f64,
    pub top: f64,
}

impl Band {
    pub fn new(base: f64, top: f64) -> Self {
        Self { base, top }
    }

    pub fn height(&self) -> f64 {
        self.top - self.base
    }

    /// Strict lower bound, inclusive upper bound: `(base, top]`
    pub fn contains(&self, h: f64) -> bool {
        h > self.base && h <= self.top
    }

    pub fn is_ordered(&self) -> bool {
        self.base.is_finite() && self.top.is_finite() && self.base < self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_roundtrip_and_rejection() {
        for action in Action::ALL {
            assert_eq!(Action::try_from(u8::from(action)).unwrap(), action);
        }
        assert!(matches!(
            Action::try_from(3),
            Err(TidewaterError::InvalidAction { value: 3, .. })
        ));
    }

    #[test]
    fn test_system_state_rejects_out_of_range() {
        assert!(matches!(
            SystemState::try_from(4),
            Err(TidewaterError::InvalidSystemState(4))
        ));
        assert_eq!(SystemState::try_from(3).unwrap(), SystemState::Both);
    }

    #[test]
    fn test_band_boundaries_belong_to_lower_band() {
        let band = Band::new(0.2, 1.7);
        assert!(!band.contains(0.2));
        assert!(band.contains(1.7));
        assert!(!band.contains(1.7000001));
    }

    #[test]
    fn test_state_flags() {
        assert!(SystemState::Both.has_lower() && SystemState::Both.has_higher());
        assert!(!SystemState::LowerOnly.has_higher());
        assert!(!SystemState::HigherOnly.has_lower());
    }
}
