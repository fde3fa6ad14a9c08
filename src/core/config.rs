//! Environment configuration
//!
//! Defaults reproduce the five-borough New York City setup. Any field can be
//! overridden from TOML; omitted fields keep their default.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TidewaterError};
use crate::core::types::WaterState;
use crate::costs::{
    GreenSpaceParams, OysterReefParams, ProtectionSystem, SaltMarshParams, SiteParams,
    SystemParams, TwoFloodwallParams,
};
use crate::interaction::{InteractionCoupling, InteractionFactors, InteractionPair};

/// Meters per discretization step of each water-level index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitScale {
    pub slr_step_m: f64,
    pub surge_step_m: f64,
}

impl Default for UnitScale {
    fn default() -> Self {
        Self {
            slr_step_m: 0.02,
            surge_step_m: 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub name: String,
    pub system: SystemParams,
}

impl RegionConfig {
    pub fn new(name: impl Into<String>, system: SystemParams) -> Self {
        Self {
            name: name.into(),
            system,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Last year index; the step taken at this year reports `done`
    pub horizon: u32,
    /// Yearly discount applied to monetary costs
    pub discount_factor: f64,
    /// Seed used by `reset(None)`
    pub seed: u64,
    pub initial_water_state: WaterState,
    pub units: UnitScale,
    pub interaction: InteractionFactors,
    /// Regions in action order
    pub regions: Vec<RegionConfig>,
    pub interaction_pairs: Vec<InteractionPair>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::nyc()
    }
}

/// Site parameters shared by the default boroughs
pub fn nyc_site() -> SiteParams {
    SiteParams {
        exposure_value: 15.3e6,
        vulnerability_factor: 0.07,
        slope: 0.0085,
        city_height: 8.5,
    }
}

impl EnvironmentConfig {
    /// The five-borough setup
    pub fn nyc() -> Self {
        let site = nyc_site();
        let two_walls = SystemParams::TwoFloodwall(TwoFloodwallParams {
            site,
            b1: 0.2,
            t1: 1.7,
            b2: 1.9,
            t2: 3.4,
        });

        Self {
            horizon: 39,
            discount_factor: 0.97,
            seed: 0,
            initial_water_state: WaterState::new(4, 1),
            units: UnitScale::default(),
            interaction: InteractionFactors::default(),
            regions: vec![
                RegionConfig::new("bronx", two_walls.clone()),
                RegionConfig::new(
                    "manhattan",
                    SystemParams::GreenSpace(GreenSpaceParams {
                        site,
                        seawall_height: 0.5,
                        b_green: 0.6,
                        t_green: 1.6,
                        b2: 1.9,
                        t2: 3.4,
                    }),
                ),
                RegionConfig::new("brooklyn", two_walls),
                RegionConfig::new(
                    "queens",
                    SystemParams::OysterReef(OysterReefParams {
                        site,
                        reef_length: 300.0,
                        b_reef: 0.0,
                        t_reef: 1.0,
                        b2: 1.9,
                        t2: 3.4,
                        damage_factor: crate::costs::constants::REEF_DAMAGE_FACTOR,
                    }),
                ),
                RegionConfig::new(
                    "staten_island",
                    SystemParams::SaltMarsh(SaltMarshParams {
                        site,
                        width: 120.0,
                        b2: 1.8,
                        t2: 3.3,
                    }),
                ),
            ],
            interaction_pairs: vec![
                InteractionPair::new("manhattan", "brooklyn"),
                InteractionPair::new("manhattan", "bronx"),
                InteractionPair::new("brooklyn", "queens"),
                InteractionPair::new("brooklyn", "bronx"),
                InteractionPair::new("brooklyn", "staten_island"),
            ],
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn region_names(&self) -> Vec<String> {
        self.regions.iter().map(|r| r.name.clone()).collect()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.discount_factor > 0.0 && self.discount_factor <= 1.0) {
            return Err(TidewaterError::InvalidConfig(format!(
                "discount_factor must lie in (0, 1], got {}",
                self.discount_factor
            )));
        }
        let factors = [self.interaction.high_to_low, self.interaction.low_to_high];
        if factors.iter().any(|f| !f.is_finite() || *f < 0.0) {
            return Err(TidewaterError::InvalidConfig(
                "interaction factors must be finite and non-negative".into(),
            ));
        }
        if !(self.units.slr_step_m > 0.0 && self.units.surge_step_m > 0.0) {
            return Err(TidewaterError::InvalidConfig(
                "unit steps must be positive".into(),
            ));
        }
        if self.regions.is_empty() {
            return Err(TidewaterError::InvalidConfig("no regions configured".into()));
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if !seen.insert(region.name.as_str()) {
                return Err(TidewaterError::InvalidConfig(format!(
                    "duplicate region name '{}'",
                    region.name
                )));
            }
            ProtectionSystem::from_params(&region.system).map_err(|e| {
                TidewaterError::InvalidConfig(format!("region '{}': {}", region.name, e))
            })?;
        }

        InteractionCoupling::new(&self.region_names(), &self.interaction_pairs, self.interaction)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::Topology;

    #[test]
    fn test_default_is_valid_nyc_setup() {
        let config = EnvironmentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.horizon, 39);
        assert_eq!(config.discount_factor, 0.97);
        assert_eq!(config.initial_water_state, WaterState::new(4, 1));
        assert_eq!(
            config.region_names(),
            vec!["bronx", "manhattan", "brooklyn", "queens", "staten_island"]
        );
        assert_eq!(config.interaction_pairs.len(), 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EnvironmentConfig::from_toml_str(
            r#"
horizon = 10
seed = 99

[interaction]
high_to_low = 0.3
low_to_high = 0.0
"#,
        )
        .unwrap();
        assert_eq!(config.horizon, 10);
        assert_eq!(config.seed, 99);
        assert_eq!(config.interaction.high_to_low, 0.3);
        assert_eq!(config.discount_factor, 0.97);
        assert_eq!(config.regions.len(), 5);
    }

    #[test]
    fn test_partial_nested_tables_keep_defaults() {
        let config = EnvironmentConfig::from_toml_str(
            r#"
[interaction]
high_to_low = 0.3

[units]
surge_step_m = 0.05
"#,
        )
        .unwrap();
        assert_eq!(config.interaction.high_to_low, 0.3);
        assert_eq!(config.interaction.low_to_high, 0.20);
        assert_eq!(config.units.slr_step_m, 0.02);
        assert_eq!(config.units.surge_step_m, 0.05);
    }

    #[test]
    fn test_toml_regions_replace_defaults() {
        let config = EnvironmentConfig::from_toml_str(
            r#"
interaction_pairs = []

[[regions]]
name = "harbor"

[regions.system]
type = "two_floodwall"
b1 = 0.2
t1 = 1.7
b2 = 1.9
t2 = 3.4

[regions.system.site]
exposure_value = 1000000.0
vulnerability_factor = 0.1
slope = 0.01
city_height = 5.0
"#,
        )
        .unwrap();
        assert_eq!(config.region_names(), vec!["harbor"]);
        let system = ProtectionSystem::from_params(&config.regions[0].system).unwrap();
        assert_eq!(system.topology(), Topology::TwoFloodwall);
    }

    #[test]
    fn test_rejects_bad_discount_and_duplicates() {
        let mut config = EnvironmentConfig::default();
        config.discount_factor = 1.5;
        assert!(matches!(config.validate(), Err(TidewaterError::InvalidConfig(_))));

        let mut config = EnvironmentConfig::default();
        let first = config.regions[0].clone();
        config.regions.push(first);
        assert!(matches!(config.validate(), Err(TidewaterError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_cyclic_pairs() {
        let mut config = EnvironmentConfig::default();
        config
            .interaction_pairs
            .push(InteractionPair::new("bronx", "manhattan"));
        assert!(matches!(config.validate(), Err(TidewaterError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_geometry_with_region_name() {
        let mut config = EnvironmentConfig::default();
        if let SystemParams::TwoFloodwall(p) = &mut config.regions[0].system {
            p.t1 = 2.5;
        }
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bronx"));
    }
}
