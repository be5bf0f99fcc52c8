//! Event Types
//!
//! Things that happened during a tick, emitted by the core for logging and
//! for the renderer to react to (recolouring a blob, hiding a commuter).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Point;

/// A single simulation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SimEvent {
    /// An agent entered the simulation.
    Spawned {
        tick: u64,
        agent_id: String,
        position: Point,
        infected: bool,
    },
    /// A healthy agent came within contact radius of an infected one.
    Infected {
        tick: u64,
        agent_id: String,
        source_id: String,
    },
    /// A path-following agent reached the end of its route.
    Arrived {
        tick: u64,
        agent_id: String,
        position: Point,
        arrivals: u32,
    },
    /// A path request could not be satisfied; nothing was spawned.
    PathUnavailable {
        tick: u64,
        from: Point,
        to: Point,
        reason: String,
    },
}

impl SimEvent {
    pub fn tick(&self) -> u64 {
        match self {
            SimEvent::Spawned { tick, .. }
            | SimEvent::Infected { tick, .. }
            | SimEvent::Arrived { tick, .. }
            | SimEvent::PathUnavailable { tick, .. } => *tick,
        }
    }
}

/// First line of every frame log: identifies the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHeader {
    pub session_id: Uuid,
    pub seed: u64,
    pub variant: String,
    pub agent_count: usize,
    pub edge_count: usize,
}

impl SessionHeader {
    pub fn new(seed: u64, variant: impl Into<String>, agent_count: usize, edge_count: usize) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            seed,
            variant: variant.into(),
            agent_count,
            edge_count,
        }
    }
}
