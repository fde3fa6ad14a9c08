//! A borough: its protection system, current state and history

use crate::core::types::{Action, SystemState};
use crate::costs::{CostBreakdown, CostModel, ProtectionSystem};
use crate::interaction::RegionSnapshot;
use crate::protection::ProtectionStateMachine;

#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    system: ProtectionSystem,
    machine: ProtectionStateMachine,
    action_history: Vec<Action>,
    cost_history: Vec<CostBreakdown>,
}

impl Region {
    pub fn new(name: impl Into<String>, system: ProtectionSystem) -> Self {
        Self {
            name: name.into(),
            system,
            machine: ProtectionStateMachine::new(),
            action_history: Vec::new(),
            cost_history: Vec::new(),
        }
    }

    pub fn system(&self) -> &ProtectionSystem {
        &self.system
    }

    pub fn state(&self) -> SystemState {
        self.machine.state()
    }

    pub fn action_history(&self) -> &[Action] {
        &self.action_history
    }

    /// Discounted, interaction-adjusted costs, one entry per completed step
    pub fn cost_history(&self) -> &[CostBreakdown] {
        &self.cost_history
    }

    pub fn last_action(&self) -> Option<Action> {
        self.action_history.last().copied()
    }

    /// Sum of every recorded year's total
    pub fn total_cost(&self) -> f64 {
        self.cost_history.iter().map(CostBreakdown::total).sum()
    }

    pub fn snapshot(&self) -> RegionSnapshot {
        RegionSnapshot {
            state: self.state(),
            critical_band: self.system.critical_band(),
        }
    }

    pub(crate) fn apply(&mut self, action: Action) -> SystemState {
        self.action_history.push(action);
        self.machine.apply(action)
    }

    pub(crate) fn record(&mut self, costs: CostBreakdown) {
        self.cost_history.push(costs);
    }

    pub fn reset(&mut self) {
        self.machine.reset();
        self.action_history.clear();
        self.cost_history.clear();
    }
}
