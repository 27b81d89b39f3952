use std::ops::Index;

use crate::action::{Action, NUM_ACTIONS};
use crate::state::NUM_STATES;

/// The optimistic prior assigned to every cell at construction
///
/// Set above any reachable per-step reward so a fresh row ties in every
/// column and the policy samples all four actions.
pub const INITIAL_Q: f32 = 10.0;

/// A fixed 128x4 table of action-value estimates
///
/// Row = encoded state, column = action index. Written only by the agent's
/// update rule and never reset between trials.
pub struct QTable {
    cells: [[f32; NUM_ACTIONS]; NUM_STATES],
}

impl QTable {
    pub fn new() -> Self {
        Self {
            cells: [[INITIAL_Q; NUM_ACTIONS]; NUM_STATES],
        }
    }

    pub fn get(&self, state: usize, action: Action) -> f32 {
        self.cells[state][action.index()]
    }

    pub fn set(&mut self, state: usize, action: Action, value: f32) {
        self.cells[state][action.index()] = value;
    }

    /// Iterate over all cell values in row-major order
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.cells.iter().flatten().copied()
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for QTable {
    type Output = [f32; NUM_ACTIONS];

    fn index(&self, state: usize) -> &Self::Output {
        &self.cells[state]
    }
}
