//! Graded green space and a floodwall behind a fixed seawall.
//!
//! States: 0 seawall only, 1 green space, 2 floodwall, 3 both. Water below the
//! seawall crest causes no damage in any state.

use serde::{Deserialize, Serialize};

use super::constants::{
    floodwall_construction_carbon, floodwall_cost_per_meter, floodwall_maintenance_carbon,
    FLOODWALL_MAINTENANCE, GREEN_BUILD_COST_PER_M, GREEN_CARBON_UPTAKE_PER_M,
    GREEN_CONSTRUCTION_CARBON_PER_M, GREEN_DAMAGE_FACTOR, GREEN_MAINTENANCE_CARBON_PER_M,
    GREEN_MAINTENANCE_PER_M,
};
use super::{CostModel, CostPair, SiteParams, StateProfiles};
use crate::core::error::{Result, TidewaterError};
use crate::core::types::{Action, Band, SystemState, WaterLevels};
use crate::damage::{Element, FloodProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreenSpaceParams {
    pub site: SiteParams,
    pub seawall_height: f64,
    pub b_green: f64,
    pub t_green: f64,
    pub b2: f64,
    pub t2: f64,
}

impl GreenSpaceParams {
    /// Length of the graded green-space surface along the slope
    pub fn slope_length(&self) -> f64 {
        let rise = self.t_green - self.b_green;
        ((rise / self.site.slope).powi(2) + rise.powi(2)).sqrt()
    }
}

#[derive(Debug, Clone)]
pub struct GreenSpaceCosts {
    params: GreenSpaceParams,
    floodwall: Band,
    l_green: f64,
    profiles: StateProfiles,
}

impl GreenSpaceCosts {
    pub fn new(params: GreenSpaceParams) -> Result<Self> {
        params.site.validate()?;
        let green = Band::new(params.b_green, params.t_green);
        let floodwall = Band::new(params.b2, params.t2);
        if params.seawall_height < 0.0
            || green.base < params.seawall_height
            || floodwall.base < green.top
        {
            return Err(TidewaterError::InvalidConfig(format!(
                "green space requires 0 <= seawall ({}) <= b_green < t_green <= b2 < t2, got [{}, {}] and [{}, {}]",
                params.seawall_height, green.base, green.top, floodwall.base, floodwall.top
            )));
        }

        let slope = params.site.slope;
        let datum = params.seawall_height;
        let profiles = StateProfiles::build(|state| {
            FloodProfile::new(slope, datum)
                .with_if(
                    state.has_lower(),
                    Element::attenuating(green, GREEN_DAMAGE_FACTOR),
                )?
                .with_if(state.has_higher(), Element::wall(floodwall))
        })?;

        let l_green = params.slope_length();
        Ok(Self {
            params,
            floodwall,
            l_green,
            profiles,
        })
    }

    pub fn params(&self) -> &GreenSpaceParams {
        &self.params
    }

    pub fn l_green(&self) -> f64 {
        self.l_green
    }

    fn green_maintenance(&self) -> CostPair {
        CostPair::new(
            GREEN_MAINTENANCE_PER_M * self.l_green,
            GREEN_MAINTENANCE_CARBON_PER_M * self.l_green,
        )
    }

    fn floodwall_maintenance(&self) -> CostPair {
        CostPair::new(FLOODWALL_MAINTENANCE, floodwall_maintenance_carbon())
    }
}

impl CostModel for GreenSpaceCosts {
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
                GREEN_BUILD_COST_PER_M * self.l_green,
                GREEN_CONSTRUCTION_CARBON_PER_M * self.l_green,
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
            cost = cost + self.green_maintenance();
        }
        if state.has_higher() {
            cost = cost + self.floodwall_maintenance();
        }
        cost
    }

    fn carbon_absorption(&self, state: SystemState) -> Option<f64> {
        Some(if state.has_lower() {
            GREEN_CARBON_UPTAKE_PER_M * self.l_green
        } else {
            0.0
        })
    }

    fn critical_band(&self) -> Band {
        self.floodwall
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::test_support::site;
    use crate::damage::unobstructed_area;

    const SLOPE: f64 = 0.0085;

    fn calculator() -> GreenSpaceCosts {
        GreenSpaceCosts::new(GreenSpaceParams {
            site: site(),
            seawall_height: 0.5,
            b_green: 0.6,
            t_green: 1.6,
            b2: 1.9,
            t2: 3.4,
        })
        .unwrap()
    }

    #[test]
    fn test_seawall_blocks_low_water() {
        let calc = calculator();
        for state in SystemState::ALL {
            assert_eq!(calc.flooded_area(WaterLevels::surge_only(0.5), state), 0.0);
        }
    }

    #[test]
    fn test_unprotected_floods_above_seawall() {
        let calc = calculator();
        let area = calc.flooded_area(WaterLevels::surge_only(1.5), SystemState::Unprotected);
        assert!((area - unobstructed_area(1.0, SLOPE)).abs() < 1e-9);
    }

    #[test]
    fn test_green_band_applies_factor() {
        let calc = calculator();
        let a1 = unobstructed_area(0.1, SLOPE);
        let a2 = unobstructed_area(0.9, SLOPE) - a1;
        let area = calc.flooded_area(WaterLevels::surge_only(1.4), SystemState::LowerOnly);
        assert!((area - (a1 * 1.0 + a2 * 0.8)).abs() < 1e-9);
    }

    #[test]
    fn test_green_factor_returns_to_one_above_band() {
        let calc = calculator();
        let a1 = unobstructed_area(0.1, SLOPE);
        let a2 = unobstructed_area(1.1, SLOPE) - a1;
        let a3 = unobstructed_area(1.3, SLOPE) - a1 - a2;
        let area = calc.flooded_area(WaterLevels::surge_only(1.8), SystemState::LowerOnly);
        assert!((area - (a1 + 0.8 * a2 + a3)).abs() < 1e-9);
    }

    #[test]
    fn test_both_in_floodwall_band() {
        let calc = calculator();
        let h = 2.5;
        let a1 = unobstructed_area(0.1, SLOPE);
        let a2 = unobstructed_area(1.1, SLOPE) - a1;
        let a3 = unobstructed_area(1.4, SLOPE) - a1 - a2;
        let a4 = (h - 1.9) * (1.9 - 0.5) / SLOPE;
        let area = calc.flooded_area(WaterLevels::surge_only(h), SystemState::Both);
        assert!((area - (a1 + 0.8 * a2 + a3 + a4)).abs() < 1e-9);
    }

    #[test]
    fn test_slope_length() {
        let calc = calculator();
        let expected = ((1.0f64 / SLOPE).powi(2) + 1.0).sqrt();
        assert!((calc.l_green() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_costs_by_state() {
        let calc = calculator();
        let l = calc.l_green();
        let green = calc.construction_cost(Action::BuildLower);
        assert!((green.monetary - (-25.0 * l)).abs() < 1e-9);

        let both = calc.maintenance_cost(SystemState::Both);
        assert!((both.monetary - (-2.7 * l - 100.0)).abs() < 1e-9);

        assert_eq!(calc.carbon_absorption(SystemState::HigherOnly), Some(0.0));
        let uptake = calc.carbon_absorption(SystemState::Both).unwrap();
        assert!((uptake - 0.17 / 1000.0 * l).abs() < 1e-12);
    }
}
