//! Per-topology cost calculators
//!
//! Every protection topology converts the damage model's flooded area into a
//! monetary and carbon flood cost, and prices construction, maintenance and
//! (for vegetative systems) carbon uptake. The closed set of topologies is the
//! [`ProtectionSystem`] enum, chosen once when a region is built.

pub mod constants;
pub mod green_space;
pub mod oyster_reef;
pub mod salt_marsh;
pub mod two_floodwall;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TidewaterError};
use crate::core::types::{Action, Band, SystemState, WaterLevels};

pub use green_space::{GreenSpaceCosts, GreenSpaceParams};
pub use oyster_reef::{OysterReefCosts, OysterReefParams};
pub use salt_marsh::{SaltMarshCosts, SaltMarshParams};
pub use two_floodwall::{TwoFloodwallCosts, TwoFloodwallParams};

/// A monetary amount together with its carbon (GHG-equivalent) counterpart
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostPair {
    pub monetary: f64,
    pub carbon: f64,
}

impl CostPair {
    pub const ZERO: CostPair = CostPair {
        monetary: 0.0,
        carbon: 0.0,
    };

    pub fn new(monetary: f64, carbon: f64) -> Self {
        Self { monetary, carbon }
    }
}

impl std::ops::Add for CostPair {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            monetary: self.monetary + rhs.monetary,
            carbon: self.carbon + rhs.carbon,
        }
    }
}

/// One region's costs for one year
///
/// Carbon fields hold SCC-weighted values once the environment has filled them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub flood_damage: f64,
    pub flood_carbon: f64,
    pub construction: f64,
    pub construction_carbon: f64,
    pub maintenance: f64,
    pub maintenance_carbon: f64,
    pub carbon_uptake: Option<f64>,
}

impl CostBreakdown {
    pub fn monetary_total(&self) -> f64 {
        self.flood_damage + self.construction + self.maintenance
    }

    pub fn carbon_total(&self) -> f64 {
        self.flood_carbon
            + self.construction_carbon
            + self.maintenance_carbon
            + self.carbon_uptake.unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.monetary_total() + self.carbon_total()
    }

    /// Scale the flood-damage fields only
    pub fn scale_flood(&mut self, multiplier: f64) {
        self.flood_damage *= multiplier;
        self.flood_carbon *= multiplier;
    }

    /// Copy with monetary fields multiplied by `factor`; carbon fields untouched
    pub fn discounted(&self, factor: f64) -> Self {
        Self {
            flood_damage: self.flood_damage * factor,
            construction: self.construction * factor,
            maintenance: self.maintenance * factor,
            ..*self
        }
    }
}

/// Shared site description: what is exposed and how the floodplain is shaped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteParams {
    /// Value of exposed assets ($ per m of shoreline width)
    pub exposure_value: f64,
    pub vulnerability_factor: f64,
    /// Floodplain slope (rise over run)
    pub slope: f64,
    /// Height of the city above the shoreline (m)
    pub city_height: f64,
}

impl SiteParams {
    /// Flood cost coefficient, negative
    pub fn cf(&self) -> f64 {
        -self.vulnerability_factor * self.exposure_value
    }

    /// Normalizing volume: the area flooded when water reaches city height
    pub fn vol_z(&self) -> f64 {
        0.5 * self.city_height * (1.0 / self.slope) * self.city_height
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.slope > 0.0) {
            return Err(TidewaterError::InvalidConfig(format!(
                "slope must be positive, got {}",
                self.slope
            )));
        }
        if !(self.city_height > 0.0) {
            return Err(TidewaterError::InvalidConfig(format!(
                "city_height must be positive, got {}",
                self.city_height
            )));
        }
        if self.exposure_value < 0.0 || self.vulnerability_factor < 0.0 {
            return Err(TidewaterError::InvalidConfig(
                "exposure_value and vulnerability_factor must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Interface every protection topology implements
pub trait CostModel {
    fn site(&self) -> &SiteParams;

    /// Flooded cross-sectional area (m²) for the given water levels
    fn flooded_area(&self, levels: WaterLevels, state: SystemState) -> f64;

    /// One-time cost of the structure an action builds; zero for `DoNothing`
    fn construction_cost(&self, action: Action) -> CostPair;

    /// Annual upkeep of every structure present in `state`
    fn maintenance_cost(&self, state: SystemState) -> CostPair;

    /// Carbon credit of vegetative structures. `None` for topologies that
    /// cannot absorb carbon at all.
    fn carbon_absorption(&self, _state: SystemState) -> Option<f64> {
        None
    }

    /// Band of the critical floodwall, used for lateral-flooding coupling
    fn critical_band(&self) -> Band;

    fn flood_damage(&self, levels: WaterLevels, state: SystemState) -> CostPair {
        let site = self.site();
        let monetary = site.cf() * self.flooded_area(levels, state) / site.vol_z();
        CostPair::new(monetary, constants::flood_carbon(monetary))
    }
}

/// Geometry bundle for one region, tagged by topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SystemParams {
    TwoFloodwall(TwoFloodwallParams),
    GreenSpace(GreenSpaceParams),
    SaltMarsh(SaltMarshParams),
    OysterReef(OysterReefParams),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    TwoFloodwall,
    GreenSpace,
    SaltMarsh,
    OysterReef,
}

/// The closed set of calculators
#[derive(Debug, Clone)]
pub enum ProtectionSystem {
    TwoFloodwall(TwoFloodwallCosts),
    GreenSpace(GreenSpaceCosts),
    SaltMarsh(SaltMarshCosts),
    OysterReef(OysterReefCosts),
}

impl ProtectionSystem {
    pub fn from_params(params: &SystemParams) -> Result<Self> {
        Ok(match params {
            SystemParams::TwoFloodwall(p) => Self::TwoFloodwall(TwoFloodwallCosts::new(p.clone())?),
            SystemParams::GreenSpace(p) => Self::GreenSpace(GreenSpaceCosts::new(p.clone())?),
            SystemParams::SaltMarsh(p) => Self::SaltMarsh(SaltMarshCosts::new(p.clone())?),
            SystemParams::OysterReef(p) => Self::OysterReef(OysterReefCosts::new(p.clone())?),
        })
    }

    pub fn topology(&self) -> Topology {
        match self {
            Self::TwoFloodwall(_) => Topology::TwoFloodwall,
            Self::GreenSpace(_) => Topology::GreenSpace,
            Self::SaltMarsh(_) => Topology::SaltMarsh,
            Self::OysterReef(_) => Topology::OysterReef,
        }
    }

    fn model(&self) -> &dyn CostModel {
        match self {
            Self::TwoFloodwall(c) => c,
            Self::GreenSpace(c) => c,
            Self::SaltMarsh(c) => c,
            Self::OysterReef(c) => c,
        }
    }
}

impl CostModel for ProtectionSystem {
    fn site(&self) -> &SiteParams {
        self.model().site()
    }

    fn flooded_area(&self, levels: WaterLevels, state: SystemState) -> f64 {
        self.model().flooded_area(levels, state)
    }

    fn construction_cost(&self, action: Action) -> CostPair {
        self.model().construction_cost(action)
    }

    fn maintenance_cost(&self, state: SystemState) -> CostPair {
        self.model().maintenance_cost(state)
    }

    fn carbon_absorption(&self, state: SystemState) -> Option<f64> {
        self.model().carbon_absorption(state)
    }

    fn critical_band(&self) -> Band {
        self.model().critical_band()
    }

    fn flood_damage(&self, levels: WaterLevels, state: SystemState) -> CostPair {
        self.model().flood_damage(levels, state)
    }
}

/// Pre-built flood profiles, one per system state
#[derive(Debug, Clone)]
pub(crate) struct StateProfiles([crate::damage::FloodProfile; 4]);

impl StateProfiles {
    pub(crate) fn build<F>(mut make: F) -> Result<Self>
    where
        F: FnMut(SystemState) -> Result<crate::damage::FloodProfile>,
    {
        Ok(Self([
            make(SystemState::Unprotected)?,
            make(SystemState::LowerOnly)?,
            make(SystemState::HigherOnly)?,
            make(SystemState::Both)?,
        ]))
    }

    pub(crate) fn get(&self, state: SystemState) -> &crate::damage::FloodProfile {
        &self.0[state.index()]
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn site() -> SiteParams {
        SiteParams {
            exposure_value: 15.3e6,
            vulnerability_factor: 0.07,
            slope: 0.0085,
            city_height: 8.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_leaves_carbon_alone() {
        let breakdown = CostBreakdown {
            flood_damage: -100.0,
            flood_carbon: -10.0,
            construction: -50.0,
            construction_carbon: -5.0,
            maintenance: -20.0,
            maintenance_carbon: -2.0,
            carbon_uptake: Some(1.0),
        };
        let d = breakdown.discounted(0.5);
        assert_eq!(d.flood_damage, -50.0);
        assert_eq!(d.construction, -25.0);
        assert_eq!(d.maintenance, -10.0);
        assert_eq!(d.flood_carbon, -10.0);
        assert_eq!(d.carbon_uptake, Some(1.0));
        assert_eq!(d.total(), -85.0 - 16.0);
    }

    #[test]
    fn test_site_normalization() {
        let site = test_support::site();
        assert_eq!(site.cf(), -0.07 * 15.3e6);
        assert!((site.vol_z() - 0.5 * 8.5 * 8.5 / 0.0085).abs() < 1e-6);
    }

    #[test]
    fn test_system_params_toml_tagging() {
        let params: SystemParams = toml::from_str(
            r#"
type = "salt_marsh"
width = 120.0
b2 = 1.8
t2 = 3.3

[site]
exposure_value = 15300000.0
vulnerability_factor = 0.07
slope = 0.0085
city_height = 8.5
"#,
        )
        .unwrap();
        let system = ProtectionSystem::from_params(&params).unwrap();
        assert_eq!(system.topology(), Topology::SaltMarsh);
    }
}
