/// Action vocabulary and its Q-table column codec
pub mod action;

/// The learning agent and its random baseline
pub mod agent;

/// Collaborator interfaces: environment, route planner, trial reports
pub mod env;

/// Test worlds
pub mod gym;

/// Greedy action selection with randomized tie-breaking
pub mod policy;

/// Perception tuples and the state encoder
pub mod state;

/// The Q-table
pub mod table;
