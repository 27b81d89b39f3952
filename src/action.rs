use strum::{EnumIter, FromRepr};

/// Number of maneuvers in the action vocabulary
pub const NUM_ACTIONS: usize = 4;

/// A maneuver the agent can take at an intersection
///
/// The discriminants are the Q-table columns and double as the state
/// encoder's 2-bit field codes, so the variant order must not change.
#[derive(EnumIter, FromRepr, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    None = 0,
    Right = 1,
    Left = 2,
    Forward = 3,
}

impl Action {
    /// The Q-table column for this action
    pub fn index(self) -> usize {
        self as usize
    }

    /// Decode a Q-table column back into an action
    ///
    /// **Panics** if `index` is outside `[0,3]`
    pub fn from_index(index: usize) -> Self {
        Self::from_repr(index).expect("action index must be in [0,3]")
    }
}

/// The signal facing the agent at its intersection
///
/// The discriminant is the encoder's 1-bit field code.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TrafficLight {
    Red = 0,
    Green = 1,
}
