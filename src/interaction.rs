//! Lateral flooding between hydrologically connected regions
//!
//! A pair `(upslope, downslope)` says water escaping the upslope region runs
//! into the downslope one. Two effects are modelled:
//!
//! - high to low: if the upslope region lacks its critical floodwall, the
//!   downslope region's flood costs grow by `high_to_low`
//! - low to high: if the downslope region lacks its critical floodwall and the
//!   water sits inside the upslope region's critical band `(base, top]`, the
//!   upslope region's flood costs grow by `low_to_high`
//!
//! Multipliers are computed from one snapshot of states and costs, then applied,
//! so adjustments never feed into each other within a step.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TidewaterError};
use crate::core::types::{Band, SystemState};
use crate::costs::CostBreakdown;

/// Directed connectivity: `upslope` drains into `downslope`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InteractionPair {
    pub upslope: String,
    pub downslope: String,
}

impl InteractionPair {
    pub fn new(upslope: impl Into<String>, downslope: impl Into<String>) -> Self {
        Self {
            upslope: upslope.into(),
            downslope: downslope.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionFactors {
    pub high_to_low: f64,
    pub low_to_high: f64,
}

impl Default for InteractionFactors {
    fn default() -> Self {
        Self {
            high_to_low: 0.20,
            low_to_high: 0.20,
        }
    }
}

/// What the coupling needs to know about one region this step
#[derive(Debug, Clone, Copy)]
pub struct RegionSnapshot {
    pub state: SystemState,
    pub critical_band: Band,
}

impl RegionSnapshot {
    pub fn has_critical_floodwall(&self) -> bool {
        self.state.has_higher()
    }
}

/// Pairs resolved to region indices
#[derive(Debug, Clone)]
pub struct InteractionCoupling {
    pairs: Vec<(usize, usize)>,
    factors: InteractionFactors,
}

impl InteractionCoupling {
    /// Resolve `pairs` against `region_names`, rejecting unknown names,
    /// self-loops and cycles.
    pub fn new(
        region_names: &[String],
        pairs: &[InteractionPair],
        factors: InteractionFactors,
    ) -> Result<Self> {
        let index: AHashMap<&str, usize> = region_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let lookup = |name: &str| {
            index.get(name).copied().ok_or_else(|| {
                TidewaterError::InvalidConfig(format!(
                    "interaction pair references unknown region '{}'",
                    name
                ))
            })
        };

        let mut resolved = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let up = lookup(&pair.upslope)?;
            let down = lookup(&pair.downslope)?;
            if up == down {
                return Err(TidewaterError::InvalidConfig(format!(
                    "region '{}' cannot interact with itself",
                    pair.upslope
                )));
            }
            resolved.push((up, down));
        }

        if let Some(node) = find_cycle(region_names.len(), &resolved) {
            return Err(TidewaterError::InvalidConfig(format!(
                "interaction pairs form a cycle through '{}'",
                region_names[node]
            )));
        }

        Ok(Self {
            pairs: resolved,
            factors,
        })
    }

    pub fn factors(&self) -> InteractionFactors {
        self.factors
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Per-region flood multipliers for this step, composed in pair order
    pub fn multipliers(&self, snapshots: &[RegionSnapshot], total_height: f64) -> Vec<f64> {
        let mut multipliers = vec![1.0; snapshots.len()];
        for &(up, down) in &self.pairs {
            let upslope = &snapshots[up];
            let downslope = &snapshots[down];

            if !upslope.has_critical_floodwall() {
                multipliers[down] *= 1.0 + self.factors.high_to_low;
            }
            if !downslope.has_critical_floodwall() && upslope.critical_band.contains(total_height)
            {
                multipliers[up] *= 1.0 + self.factors.low_to_high;
            }
        }
        multipliers
    }

    /// Scale each region's flood fields by its multiplier
    pub fn apply(
        &self,
        costs: &mut [CostBreakdown],
        snapshots: &[RegionSnapshot],
        total_height: f64,
    ) {
        let multipliers = self.multipliers(snapshots, total_height);
        for (cost, multiplier) in costs.iter_mut().zip(multipliers) {
            cost.scale_flood(multiplier);
        }
    }
}

/// Returns a node on a cycle, if any (iterative three-colour DFS)
fn find_cycle(n: usize, edges: &[(usize, usize)]) -> Option<usize> {
    let mut adjacency = vec![Vec::new(); n];
    for &(from, to) in edges {
        adjacency[from].push(to);
    }

    // 0 = unvisited, 1 = on stack, 2 = done
    let mut colour = vec![0u8; n];
    for start in 0..n {
        if colour[start] != 0 {
            continue;
        }
        let mut stack = vec![(start, 0usize)];
        colour[start] = 1;
        while let Some(&(node, next)) = stack.last() {
            if let Some(&child) = adjacency[node].get(next) {
                let top = stack.len() - 1;
                stack[top].1 += 1;
                match colour[child] {
                    0 => {
                        colour[child] = 1;
                        stack.push((child, 0));
                    }
                    1 => return Some(child),
                    _ => {}
                }
            } else {
                colour[node] = 2;
                stack.pop();
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn snapshot(state: SystemState) -> RegionSnapshot {
        RegionSnapshot {
            state,
            critical_band: Band::new(1.9, 3.4),
        }
    }

    fn flood_cost(damage: f64) -> CostBreakdown {
        CostBreakdown {
            flood_damage: damage,
            flood_carbon: damage / 10.0,
            construction: -5.0,
            maintenance: -1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_unprotected_upslope_raises_downslope_by_factor() {
        let coupling = InteractionCoupling::new(
            &names(&["up", "down"]),
            &[InteractionPair::new("up", "down")],
            InteractionFactors {
                high_to_low: 0.20,
                low_to_high: 0.0,
            },
        )
        .unwrap();
        let snapshots = [snapshot(SystemState::Unprotected), snapshot(SystemState::Both)];
        let mut costs = vec![flood_cost(-100.0), flood_cost(-50.0)];
        let before = costs.clone();
        coupling.apply(&mut costs, &snapshots, 1.0);

        assert_eq!(costs[1].flood_damage, before[1].flood_damage * 1.20);
        assert_eq!(costs[1].flood_carbon, before[1].flood_carbon * 1.20);
        assert_eq!(costs[1].construction, before[1].construction);
        assert_eq!(costs[1].maintenance, before[1].maintenance);
        assert_eq!(costs[0], before[0]);
    }

    #[test]
    fn test_protected_upslope_has_no_effect() {
        let coupling = InteractionCoupling::new(
            &names(&["up", "down"]),
            &[InteractionPair::new("up", "down")],
            InteractionFactors::default(),
        )
        .unwrap();
        let snapshots = [snapshot(SystemState::HigherOnly), snapshot(SystemState::Both)];
        assert_eq!(coupling.multipliers(&snapshots, 2.0), vec![1.0, 1.0]);
    }

    #[test]
    fn test_low_to_high_needs_height_in_band() {
        let coupling = InteractionCoupling::new(
            &names(&["up", "down"]),
            &[InteractionPair::new("up", "down")],
            InteractionFactors {
                high_to_low: 0.0,
                low_to_high: 0.10,
            },
        )
        .unwrap();
        let snapshots = [snapshot(SystemState::Both), snapshot(SystemState::Unprotected)];
        assert_eq!(coupling.multipliers(&snapshots, 1.9), vec![1.0, 1.0]);
        assert_eq!(coupling.multipliers(&snapshots, 2.5), vec![1.10, 1.0]);
        assert_eq!(coupling.multipliers(&snapshots, 3.4), vec![1.10, 1.0]);
        assert_eq!(coupling.multipliers(&snapshots, 3.5), vec![1.0, 1.0]);
    }

    #[test]
    fn test_multiple_pairs_compose_multiplicatively() {
        let coupling = InteractionCoupling::new(
            &names(&["a", "b", "c"]),
            &[InteractionPair::new("a", "c"), InteractionPair::new("b", "c")],
            InteractionFactors {
                high_to_low: 0.20,
                low_to_high: 0.0,
            },
        )
        .unwrap();
        let snapshots = [
            snapshot(SystemState::Unprotected),
            snapshot(SystemState::LowerOnly),
            snapshot(SystemState::Unprotected),
        ];
        let m = coupling.multipliers(&snapshots, 1.0);
        assert!((m[2] - 1.2 * 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_chain_does_not_cascade_within_step() {
        // a -> b -> c: b's own increase must not feed into c's
        let coupling = InteractionCoupling::new(
            &names(&["a", "b", "c"]),
            &[InteractionPair::new("a", "b"), InteractionPair::new("b", "c")],
            InteractionFactors {
                high_to_low: 0.5,
                low_to_high: 0.0,
            },
        )
        .unwrap();
        let snapshots = [
            snapshot(SystemState::Unprotected),
            snapshot(SystemState::Unprotected),
            snapshot(SystemState::Unprotected),
        ];
        assert_eq!(coupling.multipliers(&snapshots, 1.0), vec![1.0, 1.5, 1.5]);
    }

    #[test]
    fn test_rejects_unknown_self_and_cyclic_pairs() {
        let regions = names(&["a", "b", "c"]);
        let f = InteractionFactors::default();
        assert!(InteractionCoupling::new(&regions, &[InteractionPair::new("a", "z")], f).is_err());
        assert!(InteractionCoupling::new(&regions, &[InteractionPair::new("a", "a")], f).is_err());
        let cyclic = [
            InteractionPair::new("a", "b"),
            InteractionPair::new("b", "c"),
            InteractionPair::new("c", "a"),
        ];
        assert!(matches!(
            InteractionCoupling::new(&regions, &cyclic, f),
            Err(TidewaterError::InvalidConfig(_))
        ));
    }
}
