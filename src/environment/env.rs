//! The multi-region flood-adaptation environment
//!
//! One `step` is one year: water moves, every region acts, costs are computed,
//! coupled, discounted and summed into the reward. A step is validated in full
//! before anything is mutated, so a rejected call leaves the environment as it
//! was.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use super::observation::{Observation, RegionCosts, RegionStatus, StepInfo, StepResult};
use super::region::Region;
use crate::core::config::EnvironmentConfig;
use crate::core::error::{Result, TidewaterError};
use crate::core::types::{Action, SystemState, WaterLevels, WaterState};
use crate::costs::{CostBreakdown, CostModel, ProtectionSystem};
use crate::interaction::{InteractionCoupling, RegionSnapshot};
use crate::water::{TransitionTables, WaterLevelProcess};

#[derive(Debug, Clone)]
pub struct FloodEnvironment {
    config: EnvironmentConfig,
    tables: Arc<TransitionTables>,
    process: Arc<WaterLevelProcess>,
    coupling: InteractionCoupling,
    regions: Vec<Region>,
    initial_levels: WaterLevels,
    water_state: WaterState,
    levels: WaterLevels,
    year: u32,
    done: bool,
    seed: u64,
    rng: ChaCha8Rng,
}

impl FloodEnvironment {
    pub fn new(config: EnvironmentConfig, tables: TransitionTables) -> Result<Self> {
        Self::with_shared_tables(config, Arc::new(tables))
    }

    /// Build against tables shared with other environments
    pub fn with_shared_tables(
        config: EnvironmentConfig,
        tables: Arc<TransitionTables>,
    ) -> Result<Self> {
        config.validate()?;
        let process = Arc::new(WaterLevelProcess::new(&tables)?);
        check_coverage(&config, &tables)?;

        let regions = config
            .regions
            .iter()
            .map(|r| Ok(Region::new(r.name.clone(), ProtectionSystem::from_params(&r.system)?)))
            .collect::<Result<Vec<_>>>()?;
        let coupling = InteractionCoupling::new(
            &config.region_names(),
            &config.interaction_pairs,
            config.interaction,
        )?;

        info!(
            "Flood environment ready: {} regions, horizon {}, {} interaction pairs",
            regions.len(),
            config.horizon,
            coupling.pairs().len()
        );

        let levels = water_levels(&config, &tables, config.initial_water_state)?;
        let seed = config.seed;
        Ok(Self {
            water_state: config.initial_water_state,
            initial_levels: levels,
            levels,
            config,
            tables,
            process,
            coupling,
            regions,
            year: 0,
            done: false,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Start a new episode. `None` replays the configured seed.
    pub fn reset(&mut self, seed: Option<u64>) -> Observation {
        let seed = seed.unwrap_or(self.config.seed);
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.year = 0;
        self.done = false;
        self.water_state = self.config.initial_water_state;
        self.levels = self.initial_levels;
        for region in &mut self.regions {
            region.reset();
        }
        info!("Episode reset with seed {}", seed);
        self.observation()
    }

    /// Advance one year with raw action codes, one per region
    pub fn step_raw(&mut self, actions: &[u8]) -> Result<StepResult> {
        self.check_ready(actions.len())?;
        let actions = self
            .regions
            .iter()
            .zip(actions)
            .map(|(region, &value)| {
                Action::try_from(value).map_err(|_| TidewaterError::InvalidAction {
                    region: region.name.clone(),
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.step(&actions)
    }

    /// Advance one year, one action per region in region order
    pub fn step(&mut self, actions: &[Action]) -> Result<StepResult> {
        self.check_ready(actions.len())?;

        let year = self.year as usize;
        let scc = self.tables.scc(year)?;
        let mut rng = self.rng.clone();
        let next_water = self.process.sample(self.water_state, year, &mut rng)?;
        let levels = self.levels_of(next_water)?;
        let height = levels.total();
        self.rng = rng;

        let mut raw: Vec<CostBreakdown> = Vec::with_capacity(self.regions.len());
        for (region, &action) in self.regions.iter_mut().zip(actions) {
            let before = region.state();
            let after = region.apply(action);
            let costs = yearly_costs(region.system(), levels, action, after, scc);
            trace!(
                "{}: {:?} {:?} -> {:?}, raw total {:.2}",
                region.name,
                action,
                before,
                after,
                costs.total()
            );
            raw.push(costs);
        }

        let snapshots: Vec<RegionSnapshot> = self.regions.iter().map(Region::snapshot).collect();
        self.coupling.apply(&mut raw, &snapshots, height);

        let discount = self.config.discount_factor.powi(self.year as i32);
        let mut reward = 0.0;
        let mut costs = Vec::with_capacity(self.regions.len());
        for (region, breakdown) in self.regions.iter_mut().zip(raw) {
            let discounted = breakdown.discounted(discount);
            reward += discounted.total();
            region.record(discounted);
            costs.push(RegionCosts {
                name: region.name.clone(),
                costs: discounted,
            });
        }

        debug!(
            "Year {}: water ({}, {}) height {:.2} m, reward {:.2}",
            self.year, next_water.slr_index, next_water.surge_index, height, reward
        );

        self.water_state = next_water;
        self.levels = levels;
        self.done = self.year >= self.config.horizon;
        self.year += 1;

        Ok(StepResult {
            observation: self.observation(),
            reward,
            done: self.done,
            info: StepInfo {
                costs,
                year: self.year,
            },
        })
    }

    /// Whether a step with `n_actions` actions would be accepted
    pub(crate) fn check_ready(&self, n_actions: usize) -> Result<()> {
        if self.done {
            return Err(TidewaterError::HorizonExceeded {
                year: self.year,
                horizon: self.config.horizon,
            });
        }
        if n_actions != self.regions.len() {
            return Err(TidewaterError::ActionCountMismatch {
                expected: self.regions.len(),
                got: n_actions,
            });
        }
        Ok(())
    }

    /// Meters for a water state under the configured unit scale
    pub fn levels_of(&self, state: WaterState) -> Result<WaterLevels> {
        water_levels(&self.config, &self.tables, state)
    }

    pub fn observation(&self) -> Observation {
        Observation {
            water_state: self.water_state,
            system_states: self
                .regions
                .iter()
                .map(|r| RegionStatus {
                    name: r.name.clone(),
                    state: r.state(),
                })
                .collect(),
        }
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn horizon(&self) -> u32 {
        self.config.horizon
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn num_regions(&self) -> usize {
        self.regions.len()
    }

    pub fn water_state(&self) -> WaterState {
        self.water_state
    }

    pub fn water_levels(&self) -> WaterLevels {
        self.levels
    }
}

fn water_levels(
    config: &EnvironmentConfig,
    tables: &TransitionTables,
    state: WaterState,
) -> Result<WaterLevels> {
    Ok(WaterLevels::new(
        tables.slr(state.slr_index)? * config.units.slr_step_m,
        tables.surge(state.surge_index)? * config.units.surge_step_m,
    ))
}

/// Undiscounted costs for one region; carbon fields weighted by `scc`
fn yearly_costs(
    system: &ProtectionSystem,
    levels: WaterLevels,
    action: Action,
    state: SystemState,
    scc: f64,
) -> CostBreakdown {
    let flood = system.flood_damage(levels, state);
    let construction = system.construction_cost(action);
    let maintenance = system.maintenance_cost(state);
    CostBreakdown {
        flood_damage: flood.monetary,
        flood_carbon: flood.carbon * scc,
        construction: construction.monetary,
        construction_carbon: construction.carbon * scc,
        maintenance: maintenance.monetary,
        maintenance_carbon: maintenance.carbon * scc,
        carbon_uptake: system.carbon_absorption(state).map(|uptake| uptake * scc),
    }
}

/// Tables must reach every year an episode can visit and hold the start state
fn check_coverage(config: &EnvironmentConfig, tables: &TransitionTables) -> Result<()> {
    let years_needed = config.horizon as usize + 1;
    if tables.n_years() < years_needed {
        return Err(TidewaterError::MalformedTransition(format!(
            "SLR table covers {} years, horizon {} needs {}",
            tables.n_years(),
            config.horizon,
            years_needed
        )));
    }
    if tables.scc.len() < years_needed {
        return Err(TidewaterError::MalformedTransition(format!(
            "SCC table covers {} years, horizon {} needs {}",
            tables.scc.len(),
            config.horizon,
            years_needed
        )));
    }
    let start = config.initial_water_state;
    if start.slr_index >= tables.n_slr() || start.surge_index >= tables.n_surge() {
        return Err(TidewaterError::InvalidConfig(format!(
            "initial water state ({}, {}) outside tables ({} SLR, {} surge bins)",
            start.slr_index,
            start.surge_index,
            tables.n_slr(),
            tables.n_surge()
        )));
    }
    Ok(())
}
