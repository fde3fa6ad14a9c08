//! Precomputed water-level transition tables and the social-cost-of-carbon series.
//!
//! Tables are produced elsewhere (Markov-chain fitting is not part of this
//! crate) and handed over as JSON. Everything is validated once at load time;
//! a table that passes validation cannot fail mid-episode.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TidewaterError};

/// Maximum allowed deviation of a probability row sum from 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionTables {
    /// `slr[year][current]` is the distribution over next year's SLR index
    pub slr: Vec<Vec<Vec<f64>>>,
    /// `surge[0][current]` is the distribution over next surge index. The
    /// leading dimension is a placeholder; only entry 0 is read.
    pub surge: Vec<Vec<Vec<f64>>>,
    /// Discounted cumulative social cost of carbon, by year
    pub scc: Vec<f64>,
    /// Raw magnitude per SLR bin. Defaults to the bin index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slr_values: Option<Vec<f64>>,
    /// Raw magnitude per surge bin. Defaults to the bin index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surge_values: Option<Vec<f64>>,
}

impl TransitionTables {
    /// Build from parts and validate
    pub fn new(slr: Vec<Vec<Vec<f64>>>, surge: Vec<Vec<f64>>, scc: Vec<f64>) -> Result<Self> {
        let tables = Self {
            slr,
            surge: vec![surge],
            scc,
            slr_values: None,
            surge_values: None,
        };
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let tables: Self = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let tables = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded transition tables from {}: {} years, {} SLR bins, {} surge bins",
            path.display(),
            tables.n_years(),
            tables.n_slr(),
            tables.n_surge()
        );
        Ok(tables)
    }

    pub fn n_years(&self) -> usize {
        self.slr.len()
    }

    pub fn n_slr(&self) -> usize {
        self.slr.first().map(|year| year.len()).unwrap_or(0)
    }

    pub fn n_surge(&self) -> usize {
        self.surge.first().map(|rows| rows.len()).unwrap_or(0)
    }

    /// Raw discretized SLR magnitude of bin `index`
    pub fn slr(&self, index: usize) -> Result<f64> {
        bin_value("SLR", self.slr_values.as_deref(), self.n_slr(), index)
    }

    /// Raw discretized surge magnitude of bin `index`
    pub fn surge(&self, index: usize) -> Result<f64> {
        bin_value("surge", self.surge_values.as_deref(), self.n_surge(), index)
    }

    /// Social cost of carbon for `year`
    pub fn scc(&self, year: usize) -> Result<f64> {
        self.scc.get(year).copied().ok_or_else(|| {
            TidewaterError::MalformedTransition(format!(
                "SCC table has {} years, year {} requested",
                self.scc.len(),
                year
            ))
        })
    }

    /// Check shapes, probability rows and lookup lengths
    pub fn validate(&self) -> Result<()> {
        let n_slr = self.n_slr();
        let n_surge = self.n_surge();
        if self.slr.is_empty() || n_slr == 0 {
            return Err(malformed("SLR table is empty"));
        }
        if n_surge == 0 {
            return Err(malformed("surge table is empty"));
        }

        for (year, rows) in self.slr.iter().enumerate() {
            if rows.len() != n_slr {
                return Err(malformed(format!(
                    "SLR year {} has {} rows, expected {}",
                    year,
                    rows.len(),
                    n_slr
                )));
            }
            for (current, row) in rows.iter().enumerate() {
                check_row(row, n_slr, &format!("SLR[{}][{}]", year, current))?;
            }
        }
        for (current, row) in self.surge[0].iter().enumerate() {
            check_row(row, n_surge, &format!("surge[0][{}]", current))?;
        }

        if let Some(bad) = self.scc.iter().find(|v| !v.is_finite()) {
            return Err(malformed(format!("SCC table contains {}", bad)));
        }
        if let Some(values) = &self.slr_values {
            if values.len() != n_slr {
                return Err(malformed(format!(
                    "slr_values has {} entries, expected {}",
                    values.len(),
                    n_slr
                )));
            }
        }
        if let Some(values) = &self.surge_values {
            if values.len() != n_surge {
                return Err(malformed(format!(
                    "surge_values has {} entries, expected {}",
                    values.len(),
                    n_surge
                )));
            }
        }
        Ok(())
    }
}

/// Magnitude of bin `index`, defaulting to the index itself
fn bin_value(label: &str, values: Option<&[f64]>, n_bins: usize, index: usize) -> Result<f64> {
    let out_of_range = || {
        malformed(format!(
            "{} index {} out of range (n = {})",
            label, index, n_bins
        ))
    };
    if index >= n_bins {
        return Err(out_of_range());
    }
    match values {
        Some(values) => values.get(index).copied().ok_or_else(out_of_range),
        None => Ok(index as f64),
    }
}

fn malformed(msg: impl Into<String>) -> TidewaterError {
    TidewaterError::MalformedTransition(msg.into())
}

fn check_row(row: &[f64], expected_len: usize, label: &str) -> Result<()> {
    if row.len() != expected_len {
        return Err(malformed(format!(
            "{} has {} entries, expected {}",
            label,
            row.len(),
            expected_len
        )));
    }
    if let Some(p) = row.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(malformed(format!("{} contains invalid probability {}", label, p)));
    }
    let sum: f64 = row.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(malformed(format!("{} sums to {}, expected 1", label, sum)));
    }
    if (sum - 1.0).abs() > 1e-12 {
        tracing::warn!("{} sums to {:.15}; sampling renormalizes it", label, sum);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Row that moves to `target` with certainty
    pub fn certain(n: usize, target: usize) -> Vec<f64> {
        let mut row = vec![0.0; n];
        row[target] = 1.0;
        row
    }

    /// Tables where SLR climbs one bin per year (saturating) and surge stays put
    pub fn rising(n_years: usize, n_slr: usize, n_surge: usize) -> TransitionTables {
        let slr = (0..n_years)
            .map(|_| {
                (0..n_slr)
                    .map(|i| certain(n_slr, (i + 1).min(n_slr - 1)))
                    .collect()
            })
            .collect();
        let surge = (0..n_surge).map(|i| certain(n_surge, i)).collect();
        let scc = (0..n_years).map(|y| 1.0 + y as f64 * 0.1).collect();
        TransitionTables::new(slr, surge, scc).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_valid_tables_pass() {
        let tables = rising(5, 4, 3);
        assert_eq!(tables.n_years(), 5);
        assert_eq!(tables.n_slr(), 4);
        assert_eq!(tables.n_surge(), 3);
        assert_eq!(tables.slr(2).unwrap(), 2.0);
        assert!((tables.scc(4).unwrap() - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_row_not_summing_to_one() {
        let result = TransitionTables::new(
            vec![vec![vec![0.5, 0.4], vec![0.0, 1.0]]],
            vec![vec![1.0]],
            vec![1.0],
        );
        assert!(matches!(result, Err(TidewaterError::MalformedTransition(_))));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let result = TransitionTables::new(
            vec![vec![vec![1.0, 0.0], vec![1.0]]],
            vec![vec![1.0]],
            vec![1.0],
        );
        assert!(matches!(result, Err(TidewaterError::MalformedTransition(_))));
    }

    #[test]
    fn test_rejects_negative_probability() {
        let result = TransitionTables::new(
            vec![vec![vec![1.5, -0.5], vec![0.0, 1.0]]],
            vec![vec![1.0]],
            vec![1.0],
        );
        assert!(matches!(result, Err(TidewaterError::MalformedTransition(_))));
    }

    #[test]
    fn test_scc_out_of_range() {
        let tables = rising(2, 2, 2);
        assert!(matches!(
            tables.scc(2),
            Err(TidewaterError::MalformedTransition(_))
        ));
    }

    #[test]
    fn test_bin_lookup_out_of_range_is_an_error() {
        let tables = TransitionTables::from_json_str(
            r#"{ "slr": [[[0.0, 1.0], [0.0, 1.0]]], "surge": [[[1.0]]], "scc": [1.0], "slr_values": [0.0, 3.0] }"#,
        )
        .unwrap();
        assert!(matches!(tables.slr(2), Err(TidewaterError::MalformedTransition(_))));
        assert!(matches!(tables.surge(1), Err(TidewaterError::MalformedTransition(_))));
        assert!(matches!(rising(2, 3, 3).slr(3), Err(TidewaterError::MalformedTransition(_))));
    }

    #[test]
    fn test_json_roundtrip_with_value_lookups() {
        let json = r#"{
            "slr": [[[0.0, 1.0], [0.0, 1.0]]],
            "surge": [[[1.0]]],
            "scc": [2.5],
            "slr_values": [0.0, 3.0]
        }"#;
        let tables = TransitionTables::from_json_str(json).unwrap();
        assert_eq!(tables.slr(1).unwrap(), 3.0);
        assert_eq!(tables.surge(0).unwrap(), 0.0);

        let bad = r#"{ "slr": [[[0.0, 1.0], [0.0, 1.0]]], "surge": [[[1.0]]], "scc": [1.0], "slr_values": [1.0] }"#;
        assert!(TransitionTables::from_json_str(bad).is_err());
    }
}
