//! Two floodwalls at different elevations, no base seawall.
//!
//! States: 0 none, 1 lower wall F1, 2 higher wall F2, 3 both.

use serde::{Deserialize, Serialize};

use super::constants::{
    floodwall_construction_carbon, floodwall_cost_per_meter, floodwall_maintenance_carbon,
    FLOODWALL_MAINTENANCE,
};
use super::{CostModel, CostPair, SiteParams, StateProfiles};
use crate::core::error::{Result, TidewaterError};
use crate::core::types::{Action, Band, SystemState, WaterLevels};
use crate::damage::{Element, FloodProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoFloodwallParams {
    pub site: SiteParams,
    /// Lower wall F1
    pub b1: f64,
    pub t1: f64,
    /// Higher wall F2
    pub b2: f64,
    pub t2: f64,
}

#[derive(Debug, Clone)]
pub struct TwoFloodwallCosts {
    params: TwoFloodwallParams,
    lower: Band,
    higher: Band,
    profiles: StateProfiles,
}

impl TwoFloodwallCosts {
    pub fn new(params: TwoFloodwallParams) -> Result<Self> {
        params.site.validate()?;
        let lower = Band::new(params.b1, params.t1);
        let higher = Band::new(params.b2, params.t2);
        if lower.base < 0.0 || higher.base < lower.top {
            return Err(TidewaterError::InvalidConfig(format!(
                "floodwalls must satisfy 0 <= b1 < t1 <= b2 < t2, got [{}, {}] and [{}, {}]",
                lower.base, lower.top, higher.base, higher.top
            )));
        }

        let slope = params.site.slope;
        let profiles = StateProfiles::build(|state| {
            FloodProfile::new(slope, 0.0)
                .with_if(state.has_lower(), Element::wall(lower))?
                .with_if(state.has_higher(), Element::wall(higher))
        })?;

        Ok(Self {
            params,
            lower,
            higher,
            profiles,
        })
    }

    pub fn params(&self) -> &TwoFloodwallParams {
        &self.params
    }

    fn wall_cost(height: f64) -> CostPair {
        CostPair::new(
            floodwall_cost_per_meter() * height,
            floodwall_construction_carbon(height),
        )
    }
}

impl CostModel for TwoFloodwallCosts {
    fn site(&self) -> &SiteParams {
        &self.params.site
    }

    fn flooded_area(&self, levels: WaterLevels, state: SystemState) -> f64 {
        self.profiles.get(state).area(levels.total())
    }

    fn construction_cost(&self, action: Action) -> CostPair {
        match action {
            Action::DoNothing => CostPair::ZERO,
            Action::BuildLower => Self::wall_cost(self.lower.height()),
            Action::BuildHigher => Self::wall_cost(self.higher.height()),
        }
    }

    fn maintenance_cost(&self, state: SystemState) -> CostPair {
        let walls = state.has_lower() as u8 + state.has_higher() as u8;
        let per_wall = CostPair::new(FLOODWALL_MAINTENANCE, floodwall_maintenance_carbon());
        (0..walls).fold(CostPair::ZERO, |acc, _| acc + per_wall)
    }

    fn critical_band(&self) -> Band {
        self.higher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::test_support::site;

    fn calculator() -> TwoFloodwallCosts {
        TwoFloodwallCosts::new(TwoFloodwallParams {
            site: site(),
            b1: 0.2,
            t1: 1.7,
            b2: 1.9,
            t2: 3.4,
        })
        .unwrap()
    }

    #[test]
    fn test_unprotected_area_scenario() {
        let calc = calculator();
        let area = calc.flooded_area(WaterLevels::surge_only(1.0), SystemState::Unprotected);
        assert!((area - 0.5 * (1.0 / 0.0085) * 1.0).abs() < 1e-9);
        assert!((area - 58.82).abs() < 0.01);
    }

    #[test]
    fn test_lower_wall_scenario() {
        let calc = calculator();
        let levels = WaterLevels::surge_only(1.0);
        let area = calc.flooded_area(levels, SystemState::LowerOnly);
        let expected = 0.5 * 0.2 * 0.2 * (1.0 / 0.0085) + (1.0 - 0.2) * 0.2 * (1.0 / 0.0085);
        assert!((area - expected).abs() < 1e-9);
        assert!((area - 21.18).abs() < 0.01);
        assert!(area < calc.flooded_area(levels, SystemState::Unprotected));
    }

    #[test]
    fn test_higher_wall_inactive_below_its_base() {
        let calc = calculator();
        let levels = WaterLevels::surge_only(1.0);
        assert_eq!(
            calc.flooded_area(levels, SystemState::HigherOnly),
            calc.flooded_area(levels, SystemState::Unprotected)
        );
    }

    #[test]
    fn test_flood_damage_is_negative_and_normalized() {
        let calc = calculator();
        let damage = calc.flood_damage(WaterLevels::surge_only(8.5), SystemState::Unprotected);
        // Flooding to city height costs the full exposure
        assert!((damage.monetary - (-0.07 * 15.3e6)).abs() < 1e-3);
        assert!(damage.carbon < 0.0);
    }

    #[test]
    fn test_construction_cost_by_wall_height() {
        let calc = calculator();
        assert_eq!(calc.construction_cost(Action::DoNothing), CostPair::ZERO);
        let f1 = calc.construction_cost(Action::BuildLower);
        assert!((f1.monetary - (-1.38e4 / 1.5) * 1.5).abs() < 1e-9);
        assert!(f1.carbon < 0.0);
    }

    #[test]
    fn test_maintenance_is_additive() {
        let calc = calculator();
        assert_eq!(calc.maintenance_cost(SystemState::Unprotected), CostPair::ZERO);
        assert_eq!(calc.maintenance_cost(SystemState::LowerOnly).monetary, -100.0);
        assert_eq!(calc.maintenance_cost(SystemState::Both).monetary, -200.0);
    }

    #[test]
    fn test_no_carbon_absorption_capability() {
        assert_eq!(calculator().carbon_absorption(SystemState::Both), None);
    }

    #[test]
    fn test_rejects_misordered_walls() {
        let result = TwoFloodwallCosts::new(TwoFloodwallParams {
            site: site(),
            b1: 0.2,
            t1: 2.0,
            b2: 1.9,
            t2: 3.4,
        });
        assert!(matches!(result, Err(TidewaterError::InvalidConfig(_))));
    }
}
