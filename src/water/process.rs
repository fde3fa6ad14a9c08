//! Stochastic water-level evolution
//!
//! SLR follows a time-varying Markov chain (row chosen by year and current bin);
//! surge follows a stationary one. The two draws are independent.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use super::tables::TransitionTables;
use crate::core::error::{Result, TidewaterError};
use crate::core::types::WaterState;

/// Categorical samplers built once from validated tables
#[derive(Debug, Clone)]
pub struct WaterLevelProcess {
    /// `slr[year][current]`
    slr: Vec<Vec<WeightedIndex<f64>>>,
    /// `surge[current]`
    surge: Vec<WeightedIndex<f64>>,
}

impl WaterLevelProcess {
    pub fn new(tables: &TransitionTables) -> Result<Self> {
        tables.validate()?;
        let slr = tables
            .slr
            .iter()
            .map(|rows| rows.iter().map(|row| weighted(row)).collect())
            .collect::<Result<Vec<Vec<_>>>>()?;
        let surge = tables.surge[0]
            .iter()
            .map(|row| weighted(row))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { slr, surge })
    }

    pub fn n_years(&self) -> usize {
        self.slr.len()
    }

    pub fn n_slr(&self) -> usize {
        self.slr.first().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn n_surge(&self) -> usize {
        self.surge.len()
    }

    /// Draw next year's water state from `current` during `year`
    pub fn sample<R: Rng + ?Sized>(
        &self,
        current: WaterState,
        year: usize,
        rng: &mut R,
    ) -> Result<WaterState> {
        let slr_rows = self.slr.get(year).ok_or_else(|| {
            TidewaterError::MalformedTransition(format!(
                "SLR table covers {} years, year {} requested",
                self.slr.len(),
                year
            ))
        })?;
        let slr_dist = slr_rows.get(current.slr_index).ok_or_else(|| {
            TidewaterError::MalformedTransition(format!(
                "SLR index {} out of range (n = {})",
                current.slr_index,
                slr_rows.len()
            ))
        })?;
        let surge_dist = self.surge.get(current.surge_index).ok_or_else(|| {
            TidewaterError::MalformedTransition(format!(
                "surge index {} out of range (n = {})",
                current.surge_index,
                self.surge.len()
            ))
        })?;

        Ok(WaterState::new(slr_dist.sample(rng), surge_dist.sample(rng)))
    }
}

fn weighted(row: &[f64]) -> Result<WeightedIndex<f64>> {
    WeightedIndex::new(row.iter().copied())
        .map_err(|e| TidewaterError::MalformedTransition(format!("unusable probability row: {}", e)))
}
