//! Independent environments stepped in parallel

use std::sync::Arc;

use rayon::prelude::*;

use super::env::FloodEnvironment;
use super::observation::{Observation, StepResult};
use crate::core::config::EnvironmentConfig;
use crate::core::error::{Result, TidewaterError};
use crate::core::types::Action;
use crate::water::TransitionTables;

/// N environments sharing one set of tables and nothing mutable
#[derive(Debug, Clone)]
pub struct VecEnvironment {
    envs: Vec<FloodEnvironment>,
}

impl VecEnvironment {
    pub fn new(n: usize, config: EnvironmentConfig, tables: TransitionTables) -> Result<Self> {
        let tables = Arc::new(tables);
        let envs = (0..n)
            .map(|_| FloodEnvironment::with_shared_tables(config.clone(), Arc::clone(&tables)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { envs })
    }

    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    pub fn envs(&self) -> &[FloodEnvironment] {
        &self.envs
    }

    /// Reset every environment. Missing seeds fall back to the configured
    /// seed offset by the environment index, so episodes differ.
    pub fn reset_all(&mut self, seeds: Option<&[u64]>) -> Vec<Observation> {
        self.envs
            .iter_mut()
            .enumerate()
            .map(|(i, env)| {
                let seed = seeds
                    .and_then(|s| s.get(i).copied())
                    .unwrap_or_else(|| env.config().seed.wrapping_add(i as u64));
                env.reset(Some(seed))
            })
            .collect()
    }

    /// Step every environment with its own action vector. Every environment
    /// is checked first, so a rejected batch advances none of them.
    pub fn step(&mut self, actions: &[Vec<Action>]) -> Result<Vec<StepResult>> {
        if actions.len() != self.envs.len() {
            return Err(TidewaterError::ActionCountMismatch {
                expected: self.envs.len(),
                got: actions.len(),
            });
        }
        for (env, actions) in self.envs.iter().zip(actions) {
            env.check_ready(actions.len())?;
        }
        self.envs
            .par_iter_mut()
            .zip(actions.par_iter())
            .map(|(env, actions)| env.step(actions))
            .collect()
    }

    pub fn dones(&self) -> Vec<bool> {
        self.envs.iter().map(|e| e.is_done()).collect()
    }

    pub fn seeds(&self) -> Vec<u64> {
        self.envs.iter().map(|e| e.seed()).collect()
    }
}
