//! Salt marsh in front of a floodwall.
//!
//! The marsh does not occupy a height band; it lowers the effective water
//! height through wave attenuation before the floodwall profile is applied.
//! States: 0 none, 1 marsh, 2 floodwall, 3 both.

use serde::{Deserialize, Serialize};

use super::constants::{
    floodwall_construction_carbon, floodwall_cost_per_meter, floodwall_maintenance_carbon,
    FLOODWALL_MAINTENANCE, MARSH_BUILD_COST_PER_M, MARSH_CARBON_UPTAKE_PER_M,
    MARSH_CONSTRUCTION_CARBON_PER_M,
};
use super::{CostModel, CostPair, SiteParams, StateProfiles};
use crate::core::error::{Result, TidewaterError};
use crate::core::types::{Action, Band, SystemState, WaterLevels};
use crate::damage::{attenuated_height, Element, FloodProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaltMarshParams {
    pub site: SiteParams,
    /// Width of the marsh before the floodplain wedge starts (m)
    pub width: f64,
    pub b2: f64,
    pub t2: f64,
}

#[derive(Debug, Clone)]
pub struct SaltMarshCosts {
    params: SaltMarshParams,
    floodwall: Band,
    profiles: StateProfiles,
}

impl SaltMarshCosts {
    pub fn new(params: SaltMarshParams) -> Result<Self> {
        params.site.validate()?;
        if !(params.width >= 0.0) {
            return Err(TidewaterError::InvalidConfig(format!(
                "marsh width must be non-negative, got {}",
                params.width
            )));
        }
        let floodwall = Band::new(params.b2, params.t2);
        if floodwall.base < 0.0 {
            return Err(TidewaterError::InvalidConfig(format!(
                "floodwall base must be non-negative, got {}",
                floodwall.base
            )));
        }

        let slope = params.site.slope;
        let profiles = StateProfiles::build(|state| {
            FloodProfile::new(slope, 0.0).with_if(state.has_higher(), Element::wall(floodwall))
        })?;

        Ok(Self {
            params,
            floodwall,
            profiles,
        })
    }

    pub fn params(&self) -> &SaltMarshParams {
        &self.params
    }

    /// Height the floodwall profile sees in `state`
    pub fn effective_height(&self, levels: WaterLevels, state: SystemState) -> f64 {
        if state.has_lower() {
            attenuated_height(levels)
        } else {
            levels.total()
        }
    }
}

impl CostModel for SaltMarshCosts {
    fn site(&self) -> &SiteParams {
        &self.params.site
    }

    fn flooded_area(&self, levels: WaterLevels, state: SystemState) -> f64 {
        self.profiles
            .get(state)
            .area(self.effective_height(levels, state))
    }

    fn construction_cost(&self, action: Action) -> CostPair {
        match action {
            Action::DoNothing => CostPair::ZERO,
            Action::BuildLower => CostPair::new(
                MARSH_BUILD_COST_PER_M * self.params.width,
                MARSH_CONSTRUCTION_CARBON_PER_M * self.params.width,
            ),
            Action::BuildHigher => {
                let h2 = self.floodwall.height();
                CostPair::new(
                    floodwall_cost_per_meter() * h2,
                    floodwall_construction_carbon(h2),
                )
            }
        }
    }

    /// The marsh itself needs no upkeep
    fn maintenance_cost(&self, state: SystemState) -> CostPair {
        if state.has_higher() {
            CostPair::new(FLOODWALL_MAINTENANCE, floodwall_maintenance_carbon())
        } else {
            CostPair::ZERO
        }
    }

    fn carbon_absorption(&self, state: SystemState) -> Option<f64> {
        Some(if state.has_lower() {
            MARSH_CARBON_UPTAKE_PER_M * self.params.width
        } else {
            0.0
        })
    }

    fn critical_band(&self) -> Band {
        self.floodwall
    }
}
