use log::debug;
use rand::{rngs::StdRng, seq::IteratorRandom, Rng, SeedableRng};
use strum::IntoEnumIterator;

use crate::action::Action;
use crate::env::{Environment, Pos, RoutePlanner};
use crate::policy;
use crate::state::{self, Perception};
use crate::table::{QTable, INITIAL_Q};

/// Weight given to each newly observed reward
pub const ALPHA: f32 = 0.4;

/// Rewards at or above this are the one-time destination bonus and are
/// excluded from the value estimates
pub const GOAL_REWARD_CUTOFF: f32 = 3.0;

/// A Q-learning agent for the intersection grid
///
/// Owns the [`QTable`] for its whole lifetime; the table is written only by
/// [`learn`](LearningAgent::learn) and survives trial resets.
pub struct LearningAgent {
    q_table: QTable,
    rng: StdRng,
}

impl LearningAgent {
    pub fn new() -> Self {
        Self::seeded(rand::thread_rng().gen())
    }

    /// Construct with a fixed RNG seed for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            q_table: QTable::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Prepare for a new trial
    ///
    /// Only the planner is retargeted; the Q-table carries over.
    pub fn reset<W: RoutePlanner>(&mut self, world: &mut W, destination: Option<Pos>) {
        world.route_to(destination);
    }

    /// Fold one observed reward into the cell for the pre-action state
    ///
    /// The destination bonus (reward >= [`GOAL_REWARD_CUTOFF`]) is skipped.
    /// The first applied reward replaces the optimistic prior; later rewards
    /// fold in as an exponential moving average. Applied rewards all sit
    /// below the cutoff, so an updated cell is strictly below [`INITIAL_Q`].
    pub fn learn(
        &mut self,
        reward: f32,
        prev_waypoint: Action,
        perception: &Perception,
        action: Action,
    ) {
        if reward >= GOAL_REWARD_CUTOFF {
            return;
        }

        let prev_state = state::encode(prev_waypoint, perception);
        let cell = self.q_table.get(prev_state, action);
        let value = if cell < INITIAL_Q {
            (1.0 - ALPHA) * cell + ALPHA * reward
        } else {
            ALPHA * reward
        };
        self.q_table.set(prev_state, action, value);

        debug!("updated state {prev_state}, q-row {:?}", self.q_table[prev_state]);
    }

    /// Run one tick: sense, decide, act, learn
    ///
    /// The waypoint is captured before acting because the learn step scores
    /// the pre-action state.
    pub fn update<W: Environment + RoutePlanner>(&mut self, world: &mut W, t: u32) {
        let prev_waypoint = world.next_waypoint();
        let perception = world.sense();
        let deadline = world.deadline();
        let state = state::encode(prev_waypoint, &perception);

        let action = policy::select(&self.q_table[state], &mut self.rng);
        let reward = world.act(action);
        self.learn(reward, prev_waypoint, &perception, action);

        debug!(
            "t = {t}, deadline = {deadline}, state = {state}, \
             action = {action:?}, reward = {reward}"
        );
    }
}

impl Default for LearningAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// A baseline agent that drives at random and never learns
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::seeded(rand::thread_rng().gen())
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn reset<W: RoutePlanner>(&mut self, world: &mut W, destination: Option<Pos>) {
        world.route_to(destination);
    }

    pub fn update<W: Environment + RoutePlanner>(&mut self, world: &mut W, t: u32) {
        let _ = world.next_waypoint();
        let deadline = world.deadline();
        let action = Action::iter()
            .choose(&mut self.rng)
            .expect("the action vocabulary is never empty");
        let reward = world.act(action);

        debug!("t = {t}, deadline = {deadline}, action = {action:?}, reward = {reward}");
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::action::TrafficLight;
    use crate::env::tests::MockWorld;
    use crate::state::NUM_STATES;
    use crate::table::INITIAL_Q;

    use super::*;

    fn quiet_intersection() -> Perception {
        Perception {
            light: TrafficLight::Green,
            oncoming: Action::None,
            left: Action::None,
            right: Action::None,
        }
    }

    #[test]
    fn destination_bonus_is_skipped() {
        let mut agent = LearningAgent::seeded(1);
        let perception = quiet_intersection();
        let state = state::encode(Action::Forward, &perception);

        agent.learn(12.0, Action::Forward, &perception, Action::Forward);
        assert_eq!(agent.q_table().get(state, Action::Forward), INITIAL_Q);
    }

    #[test]
    fn first_visit_then_moving_average() {
        let mut agent = LearningAgent::seeded(1);
        let perception = quiet_intersection();
        let state = state::encode(Action::Forward, &perception);

        agent.learn(-1.0, Action::Forward, &perception, Action::Left);
        let first = ALPHA * -1.0;
        assert_eq!(agent.q_table().get(state, Action::Left), first);

        agent.learn(-1.0, Action::Forward, &perception, Action::Left);
        let second = (1.0 - ALPHA) * first + ALPHA * -1.0;
        assert_eq!(agent.q_table().get(state, Action::Left), second);
    }

    #[test]
    fn learn_touches_exactly_one_cell() {
        let mut agent = LearningAgent::seeded(1);
        let perception = quiet_intersection();

        agent.learn(2.0, Action::Forward, &perception, Action::Forward);
        let updated = agent
            .q_table()
            .values()
            .filter(|&q| q != INITIAL_Q)
            .count();
        assert_eq!(updated, 1);
    }

    #[test]
    fn reset_retargets_planner_but_keeps_the_table() {
        let mut agent = LearningAgent::seeded(1);
        let perception = quiet_intersection();
        let mut world = MockWorld::new(Action::Forward, perception, 2.0);

        agent.learn(-0.5, Action::Forward, &perception, Action::Right);
        let state = state::encode(Action::Forward, &perception);
        let before = agent.q_table().get(state, Action::Right);

        agent.reset(&mut world, Some((3, 2)));
        assert_eq!(world.routed_to, vec![Some((3, 2))]);
        assert_eq!(agent.q_table().get(state, Action::Right), before);
    }

    #[test]
    fn update_learns_from_the_pre_action_state() {
        let mut agent = LearningAgent::seeded(5);
        let perception = quiet_intersection();
        let mut world = MockWorld::new(Action::Forward, perception, 2.0);

        agent.update(&mut world, 0);

        assert_eq!(world.taken.len(), 1);
        let action = world.taken[0];
        let state = state::encode(Action::Forward, &perception);
        assert_eq!(agent.q_table().get(state, action), ALPHA * 2.0);
        // no other row was touched
        for s in 0..NUM_STATES {
            if s != state {
                assert!(agent.q_table()[s].iter().all(|&q| q == INITIAL_Q));
            }
        }
    }

    #[test]
    fn random_agent_never_learns() {
        let mut agent = RandomAgent::seeded(3);
        let perception = quiet_intersection();
        let mut world = MockWorld::new(Action::Forward, perception, -1.0);

        for t in 0..10 {
            agent.update(&mut world, t);
        }
        assert_eq!(world.taken.len(), 10);
    }
}
