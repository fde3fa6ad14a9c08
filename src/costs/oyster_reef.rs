//! Oyster reef breakwater in front of a floodwall.
//!
//! The reef attenuates waves while the water sits inside its critical band
//! `[b_reef, t_reef]`; above its crest the water floods at full severity again.
//! There is no base seawall. States: 0 none, 1 reef, 2 floodwall, 3 both.

use serde::{Deserialize, Serialize};

use super::constants::{
    floodwall_construction_carbon, floodwall_cost_per_meter, floodwall_maintenance_carbon,
    FLOODWALL_MAINTENANCE, REEF_BUILD_COST_PER_M, REEF_CONSTRUCTION_CARBON_PER_M,
    REEF_DAMAGE_FACTOR, REEF_MAINTENANCE_PER_M,
};
use super::{CostModel, CostPair, SiteParams, StateProfiles};
use crate::core::error::{Result, TidewaterError};
use crate::core::types::{Action, Band, SystemState, WaterLevels};
use crate::damage::{Element, FloodProfile};

fn default_reef_damage_factor() -> f64 {
    REEF_DAMAGE_FACTOR
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OysterReefParams {
    pub site: SiteParams,
    /// Alongshore length of the reef (m)
    pub reef_length: f64,
    pub b_reef: f64,
    pub t_reef: f64,
    pub b2: f64,
    pub t2: f64,
    #[serde(default = "default_reef_damage_factor")]
    pub damage_factor: f64,
}

#[derive(Debug, Clone)]
pub struct OysterReefCosts {
    params: OysterReefParams,
    floodwall: Band,
    profiles: StateProfiles,
}

impl OysterReefCosts {
    pub fn new(params: OysterReefParams) -> Result<Self> {
        params.site.validate()?;
        if !(params.reef_length >= 0.0) {
            return Err(TidewaterError::InvalidConfig(format!(
                "reef length must be non-negative, got {}",
                params.reef_length
            )));
        }
        let reef = Band::new(params.b_reef, params.t_reef);
        let floodwall = Band::new(params.b2, params.t2);
        if reef.base < 0.0 || floodwall.base < reef.top {
            return Err(TidewaterError::InvalidConfig(format!(
                "oyster reef requires 0 <= b_reef < t_reef <= b2 < t2, got [{}, {}] and [{}, {}]",
                reef.base, reef.top, floodwall.base, floodwall.top
            )));
        }

        let slope = params.site.slope;
        let factor = params.damage_factor;
        let profiles = StateProfiles::build(|state| {
            FloodProfile::new(slope, 0.0)
                .with_if(state.has_lower(), Element::attenuating(reef, factor))?
                .with_if(state.has_higher(), Element::wall(floodwall))
        })?;

        Ok(Self {
            params,
            floodwall,
            profiles,
        })
    }

    pub fn params(&self) -> &OysterReefParams {
        &self.params
    }
}

impl CostModel for OysterReefCosts {
    fn site(&self) -> &SiteParams {
        &self.params.site
    }

    fn flooded_area(&self, levels: WaterLevels, state: SystemState) -> f64 {
        self.profiles.get(state).area(levels.total())
    }

    fn construction_cost(&self, action: Action) -> CostPair {
        match action {
            Action::DoNothing => CostPair::ZERO,
            Action::BuildLower => CostPair::new(
                REEF_BUILD_COST_PER_M * self.params.reef_length,
                REEF_CONSTRUCTION_CARBON_PER_M * self.params.reef_length,
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

    fn maintenance_cost(&self, state: SystemState) -> CostPair {
        let mut cost = CostPair::ZERO;
        if state.has_lower() {
            cost = cost + CostPair::new(REEF_MAINTENANCE_PER_M * self.params.reef_length, 0.0);
        }
        if state.has_higher() {
            cost = cost + CostPair::new(FLOODWALL_MAINTENANCE, floodwall_maintenance_carbon());
        }
        cost
    }

    fn critical_band(&self) -> Band {
        self.floodwall
    }
}
