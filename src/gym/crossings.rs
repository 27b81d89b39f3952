use rand::{rngs::StdRng, seq::IteratorRandom, seq::SliceRandom, Rng, SeedableRng};
use strum::{EnumIter, IntoEnumIterator};

use crate::action::{Action, TrafficLight};
use crate::env::{Environment, Pos, Report, RoutePlanner};
use crate::state::Perception;

const GRID_W: usize = 8;
const GRID_H: usize = 6;
/// Ticks between light phase changes at every intersection
const LIGHT_PERIOD: u32 = 3;
/// Chance of a dummy car on each approach, per tick
const TRAFFIC_DENSITY: f64 = 0.3;
/// Deadline granted per block of L1 distance to the destination
const DEADLINE_FACTOR: i32 = 5;

#[derive(EnumIter, Clone, Copy, PartialEq, Eq, Debug)]
enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    fn left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    fn right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    fn is_vertical(self) -> bool {
        matches!(self, Self::North | Self::South)
    }

    /// Advance one block; the grid wraps at its edges
    fn step(self, (x, y): Pos) -> Pos {
        match self {
            Self::North => (x, (y + GRID_H - 1) % GRID_H),
            Self::South => (x, (y + 1) % GRID_H),
            Self::East => ((x + 1) % GRID_W, y),
            Self::West => ((x + GRID_W - 1) % GRID_W, y),
        }
    }
}

/// Shortest signed offset from `from` to `to` on a wrapping axis
fn wrap_delta(from: usize, to: usize, size: usize) -> isize {
    let size = size as isize;
    let mut d = to as isize - from as isize;
    if d > size / 2 {
        d -= size;
    }
    if d < -(size / 2) {
        d += size;
    }
    d
}

/// A wrapping grid of signalled intersections with random dummy traffic
///
/// One agent drives toward a per-trial destination under a deadline. Lights
/// alternate between the north-south and east-west approaches on a fixed
/// period, staggered by intersection. Rewards: 2.0 for a legal move along
/// the planned route, -0.5 for a legal move off it, -1.0 for a violation
/// (the move is refused), 0.0 for idling, and a 12.0 bonus on arrival.
pub struct Crossings {
    pos: Pos,
    heading: Heading,
    destination: Pos,
    deadline: i32,
    t: u32,
    perception: Perception,
    done: bool,
    rng: StdRng,
    pub report: Report,
}

impl Crossings {
    pub fn new() -> Self {
        Self::seeded(rand::thread_rng().gen())
    }

    pub fn seeded(seed: u64) -> Self {
        let mut world = Self {
            pos: (0, 0),
            heading: Heading::East,
            destination: (0, 0),
            deadline: 0,
            t: 0,
            perception: Perception {
                light: TrafficLight::Red,
                oncoming: Action::None,
                left: Action::None,
                right: Action::None,
            },
            done: false,
            rng: StdRng::seed_from_u64(seed),
            report: Report::new(vec!["reward", "steps", "success"]),
        };
        world.begin_trial();
        world
    }

    /// Start a new trial: random start, heading, and destination
    ///
    /// **Returns** the destination, for handing to the agent's reset hook.
    pub fn begin_trial(&mut self) -> Pos {
        self.pos = (
            self.rng.gen_range(0..GRID_W),
            self.rng.gen_range(0..GRID_H),
        );
        self.heading = Heading::iter()
            .choose(&mut self.rng)
            .expect("heading vocabulary is never empty");
        self.destination = loop {
            let candidate = (
                self.rng.gen_range(0..GRID_W),
                self.rng.gen_range(0..GRID_H),
            );
            if candidate != self.pos {
                break candidate;
            }
        };
        self.deadline = DEADLINE_FACTOR * self.l1_to_destination();
        self.done = false;
        self.perception = self.sample_perception();
        self.destination
    }

    /// Whether the current trial is still running
    pub fn is_active(&self) -> bool {
        !self.done && self.deadline > 0
    }

    pub fn destination(&self) -> Pos {
        self.destination
    }

    fn l1_to_destination(&self) -> i32 {
        let dx = wrap_delta(self.pos.0, self.destination.0, GRID_W);
        let dy = wrap_delta(self.pos.1, self.destination.1, GRID_H);
        (dx.abs() + dy.abs()) as i32
    }

    /// The light governing the given approach at this intersection and tick
    fn light_for(&self, heading: Heading) -> TrafficLight {
        let phase = (self.t / LIGHT_PERIOD) as usize + self.pos.0 + self.pos.1;
        let ns_green = phase % 2 == 0;
        if heading.is_vertical() == ns_green {
            TrafficLight::Green
        } else {
            TrafficLight::Red
        }
    }

    fn sample_perception(&mut self) -> Perception {
        let light = self.light_for(self.heading);
        let mut approach = |rng: &mut StdRng| {
            if rng.gen_bool(TRAFFIC_DENSITY) {
                *[Action::Left, Action::Right, Action::Forward]
                    .choose(rng)
                    .expect("maneuver list is non-empty")
            } else {
                Action::None
            }
        };
        Perception {
            light,
            oncoming: approach(&mut self.rng),
            left: approach(&mut self.rng),
            right: approach(&mut self.rng),
        }
    }

    /// The shortest-direction hint toward the destination, relative to the
    /// agent's heading; `None` once it has arrived
    fn current_waypoint(&self) -> Action {
        if self.pos == self.destination {
            return Action::None;
        }

        let dx = wrap_delta(self.pos.0, self.destination.0, GRID_W);
        let dy = wrap_delta(self.pos.1, self.destination.1, GRID_H);
        let desired = if dx > 0 {
            Heading::East
        } else if dx < 0 {
            Heading::West
        } else if dy > 0 {
            Heading::South
        } else {
            Heading::North
        };

        if desired == self.heading {
            Action::Forward
        } else if desired == self.heading.right() {
            Action::Right
        } else if desired == self.heading.left() {
            Action::Left
        } else {
            // turning back takes two rights; start with one
            Action::Right
        }
    }

    /// US right-of-way, simplified: forward and left need green, left also
    /// yields to oncoming through-traffic, right-on-red yields to cross
    /// traffic arriving from the left
    fn is_legal(&self, action: Action, perception: &Perception) -> bool {
        match action {
            Action::None => true,
            Action::Forward => perception.light == TrafficLight::Green,
            Action::Left => {
                perception.light == TrafficLight::Green
                    && !matches!(perception.oncoming, Action::Forward | Action::Right)
            }
            Action::Right => {
                perception.light == TrafficLight::Green || perception.left != Action::Forward
            }
        }
    }
}

impl Default for Crossings {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for Crossings {
    fn sense(&self) -> Perception {
        self.perception
    }

    fn deadline(&self) -> i32 {
        self.deadline
    }

    fn act(&mut self, action: Action) -> f32 {
        let waypoint = self.current_waypoint();
        let perception = self.perception;

        self.t += 1;
        self.deadline -= 1;
        self.report.accumulate("steps", 1.0);

        let reward = if !self.is_legal(action, &perception) {
            -1.0
        } else if action == Action::None {
            0.0
        } else {
            self.heading = match action {
                Action::Left => self.heading.left(),
                Action::Right => self.heading.right(),
                _ => self.heading,
            };
            self.pos = self.heading.step(self.pos);
            if self.pos == self.destination {
                self.done = true;
                self.report.accumulate("success", 1.0);
                12.0
            } else if action == waypoint {
                2.0
            } else {
                -0.5
            }
        };

        self.report.accumulate("reward", reward as f64);
        self.perception = self.sample_perception();
        reward
    }
}

impl RoutePlanner for Crossings {
    fn next_waypoint(&mut self) -> Action {
        self.current_waypoint()
    }

    fn route_to(&mut self, destination: Option<Pos>) {
        if let Some(destination) = destination {
            self.destination = destination;
            self.deadline = DEADLINE_FACTOR * self.l1_to_destination();
        }
    }
}
