use std::collections::BTreeMap;

use crate::action::Action;
use crate::state::Perception;

/// An intersection coordinate on the grid
pub type Pos = (usize, usize);

/// The world the agent drives in
///
/// The driver advances one tick at a time; no method is called concurrently.
pub trait Environment {
    /// The agent's view of its immediate surroundings for this tick
    fn sense(&self) -> Perception;

    /// Ticks remaining before the current trial is abandoned
    fn deadline(&self) -> i32;

    /// Execute a maneuver, producing the reward for it
    fn act(&mut self, action: Action) -> f32;
}

/// A route planner that suggests the next maneuver toward the destination
pub trait RoutePlanner {
    /// The suggested maneuver for this tick, recomputed from the agent's
    /// position and destination
    fn next_waypoint(&mut self) -> Action;

    /// Retarget the planner for a new trial; `None` lets the planner pick
    /// a destination itself
    fn route_to(&mut self, destination: Option<Pos>);
}

/// Per-trial tallies accumulated by an environment
///
/// Keys are fixed at construction and zeroed again by [`take`](Report::take)
/// at trial boundaries.
#[derive(Debug, Clone)]
pub struct Report {
    data: BTreeMap<&'static str, f64>,
}

impl Report {
    pub fn new(keys: Vec<&'static str>) -> Self {
        Self {
            data: keys.into_iter().map(|k| (k, 0.0)).collect(),
        }
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.data.keys().copied().collect()
    }

    /// Add `amount` to a tally
    ///
    /// **Panics** on a key that was not declared at construction.
    pub fn accumulate(&mut self, key: &'static str, amount: f64) {
        let entry = self
            .data
            .get_mut(key)
            .expect("report keys are fixed at construction");
        *entry += amount;
    }

    pub fn get(&self, key: &'static str) -> f64 {
        self.data.get(key).copied().unwrap_or_default()
    }

    /// Return the finished trial's tallies and reset them to zero
    pub fn take(&mut self) -> BTreeMap<&'static str, f64> {
        let fresh = self.keys().into_iter().map(|k| (k, 0.0)).collect();
        std::mem::replace(&mut self.data, fresh)
    }
}
