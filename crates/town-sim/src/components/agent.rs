//! Agent Components
//!
//! Components for blobs and commuters: identity, position, infection state,
//! and the two motion modes.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use town_events::{AgentStatus, Point};

use crate::pathfinding::Route;

/// Slack on the end-of-edge check, as a fraction of one tick's progress.
/// Absorbs the rounding of `rate` itself, never a whole step.
pub const PROGRESS_SLACK: f64 = 1e-2;

/// Marker component identifying an entity as an agent
#[derive(Component, Debug, Clone, Default)]
pub struct Agent;

/// Unique identifier for an agent
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub String);

/// Current world position
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Point);

/// Infection flag. Once set it never clears.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Infection {
    infected: bool,
}

impl Infection {
    pub fn healthy() -> Self {
        Self { infected: false }
    }

    pub fn seeded() -> Self {
        Self { infected: true }
    }

    pub fn new(infected: bool) -> Self {
        Self { infected }
    }

    pub fn is_infected(&self) -> bool {
        self.infected
    }

    /// Mark infected; returns true if this changed the state.
    pub fn infect(&mut self) -> bool {
        let newly = !self.infected;
        self.infected = true;
        newly
    }
}

/// Marker: agent moves by random walk inside the bounds
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FreeWalk;

/// What happens once a route is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalPolicy {
    /// Stop at the destination
    Idle,
    /// Walk back once, then stop
    #[default]
    ReturnOnce,
    /// Walk back and forth forever
    Shuttle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelState {
    Idle,
    Traversing,
    /// Momentary; drained on the following tick
    Arrived,
}

/// Path-follow mode: a route, a cursor into it and progress along the
/// current edge.
#[derive(Component, Debug, Clone)]
pub struct PathFollower {
    route: Route,
    cursor: usize,
    progress: f32,
    /// Ticks spent on the current edge
    steps: u32,
    state: TravelState,
    policy: ArrivalPolicy,
    arrivals: u32,
}

impl PathFollower {
    /// Start traversing `route` immediately. An empty route arrives at once.
    pub fn traversing(route: Route, policy: ArrivalPolicy) -> Self {
        let mut follower = Self::idle(policy);
        follower.assign(route);
        follower
    }

    pub fn idle(policy: ArrivalPolicy) -> Self {
        Self {
            route: Route::default(),
            cursor: 0,
            progress: 0.0,
            steps: 0,
            state: TravelState::Idle,
            policy,
            arrivals: 0,
        }
    }

    pub fn state(&self) -> TravelState {
        self.state
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn policy(&self) -> ArrivalPolicy {
        self.policy
    }

    /// Number of times this agent has reached the end of a route.
    pub fn arrivals(&self) -> u32 {
        self.arrivals
    }

    pub fn status(&self) -> AgentStatus {
        match self.state {
            TravelState::Idle => AgentStatus::Idle,
            TravelState::Traversing => AgentStatus::Traversing,
            TravelState::Arrived => AgentStatus::Arrived,
        }
    }

    /// Replace the route and start traversing it.
    pub fn assign(&mut self, route: Route) {
        self.cursor = 0;
        self.progress = 0.0;
        self.steps = 0;
        if route.is_empty() {
            self.state = TravelState::Arrived;
            self.arrivals += 1;
        } else {
            self.state = TravelState::Traversing;
        }
        self.route = route;
    }

    /// Advance by `rate` of the current edge. Returns the new position while
    /// traversing, `None` otherwise.
    pub fn advance(&mut self, rate: f32) -> Option<Point> {
        if self.state != TravelState::Traversing {
            return None;
        }
        let edge = *self.route.get(self.cursor)?;

        // Progress is recomputed from whole ticks so rounding never accumulates
        self.steps += 1;
        let covered = f64::from(self.steps) * f64::from(rate);
        if covered + f64::from(rate) * PROGRESS_SLACK < 1.0 {
            self.progress = covered as f32;
            return Some(edge.point_at(self.progress));
        }

        self.cursor += 1;
        self.progress = 0.0;
        self.steps = 0;
        if self.cursor >= self.route.hops() {
            self.state = TravelState::Arrived;
            self.arrivals += 1;
        }
        Some(edge.end)
    }

    /// Leave the Arrived state according to the policy. Returns true if
    /// there was an arrival to drain.
    pub fn drain_arrival(&mut self) -> bool {
        if self.state != TravelState::Arrived {
            return false;
        }

        match self.policy {
            ArrivalPolicy::Idle => self.state = TravelState::Idle,
            ArrivalPolicy::ReturnOnce => {
                if self.arrivals <= 1 && !self.route.is_empty() {
                    let back = self.route.reversed();
                    self.assign(back);
                } else {
                    self.state = TravelState::Idle;
                }
            }
            ArrivalPolicy::Shuttle => {
                if self.route.is_empty() {
                    self.state = TravelState::Idle;
                } else {
                    let back = self.route.reversed();
                    self.assign(back);
                }
            }
        }
        true
    }
}

/// Resource: hands out sequential agent IDs
#[derive(Resource, Debug, Default)]
pub struct AgentCounter {
    next: usize,
}

impl AgentCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// e.g. `blob_0000`, `commuter_0001`
    pub fn next_id(&mut self, prefix: &str) -> AgentId {
        let id = AgentId(format!("{}_{:04}", prefix, self.next));
        self.next += 1;
        id
    }

    pub fn issued(&self) -> usize {
        self.next
    }
}
