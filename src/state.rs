use crate::action::{Action, TrafficLight};

/// Number of rows in the Q-table: 7 bits of encoded perception
pub const NUM_STATES: usize = 128;

/// What the agent senses at its intersection on one tick
///
/// `right` is observed but never encoded: traffic from the right does not
/// affect right-of-way legality in this rule set.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Perception {
    pub light: TrafficLight,
    pub oncoming: Action,
    pub left: Action,
    pub right: Action,
}

/// Encode a waypoint and perception into a Q-table row index
///
/// Concatenates fixed-width binary codes in the order waypoint (2 bits),
/// light (1 bit), oncoming (2 bits), left (2 bits). Pure and recomputed on
/// every call.
pub fn encode(waypoint: Action, perception: &Perception) -> usize {
    (waypoint.index() << 5)
        | ((perception.light as usize) << 4)
        | (perception.oncoming.index() << 2)
        | perception.left.index()
}
