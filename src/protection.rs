//! Protection configuration state machine
//!
//! Four states, three actions, fully deterministic. Built structures are never
//! removed, so every transition is idempotent once its target is reached.

use crate::core::error::Result;
use crate::core::types::{Action, SystemState};
use crate::core::types::SystemState::{Both, HigherOnly, LowerOnly, Unprotected};

/// `TRANSITIONS[action][state]` is the next state
const TRANSITIONS: [[SystemState; 4]; 3] = [
    // Do nothing
    [Unprotected, LowerOnly, HigherOnly, Both],
    // Build lower / nature-based
    [LowerOnly, LowerOnly, Both, Both],
    // Build higher / floodwall
    [HigherOnly, Both, HigherOnly, Both],
];

/// Next configuration after applying `action` in `state`
pub fn next_state(state: SystemState, action: Action) -> SystemState {
    TRANSITIONS[action.index()][state.index()]
}

/// Same as [`next_state`] for raw indices, rejecting anything out of range
pub fn next_state_raw(state: u8, action: u8) -> Result<SystemState> {
    let state = SystemState::try_from(state)?;
    let action = Action::try_from(action)?;
    Ok(next_state(state, action))
}

/// The 0/1 matrix form of an action: row `i` is the one-hot successor of state `i`
pub fn transition_matrix(action: Action) -> [[u8; 4]; 4] {
    let mut matrix = [[0u8; 4]; 4];
    for state in SystemState::ALL {
        matrix[state.index()][next_state(state, action).index()] = 1;
    }
    matrix
}

/// Per-region protection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProtectionStateMachine {
    state: SystemState,
}

impl ProtectionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    /// Apply an action and return the new state
    pub fn apply(&mut self, action: Action) -> SystemState {
        self.state = next_state(self.state, action);
        self.state
    }

    pub fn reset(&mut self) {
        self.state = SystemState::Unprotected;
    }
}
