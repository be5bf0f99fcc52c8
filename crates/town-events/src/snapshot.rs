//! Snapshot Types
//!
//! Serialization structs for what the renderer consumes: the per-tick agent
//! frame and the static city layout.

use serde::{Deserialize, Serialize};

use crate::Point;

/// Whether an edge is a street or a building-to-street connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Road,
    Connector,
}

/// Which road a building's door faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Door on the +z side, joined to the block's +z road.
    PositiveZ,
    /// Door on the -z side (model rotated half a turn).
    NegativeZ,
}

impl Facing {
    /// Model yaw in radians for the renderer.
    pub fn yaw(&self) -> f32 {
        match self {
            Facing::PositiveZ => 0.0,
            Facing::NegativeZ => std::f32::consts::PI,
        }
    }
}

/// Building model variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Flat,
    Flat2,
    House,
}

/// Coarse agent state for colouring and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Free-walk mode.
    Wandering,
    Idle,
    Traversing,
    Arrived,
}

/// One agent's state after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFrame {
    pub agent_id: String,
    pub position: Point,
    pub infected: bool,
    pub status: AgentStatus,
}

/// All agents after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickFrame {
    pub tick: u64,
    pub infected_count: usize,
    pub agents: Vec<AgentFrame>,
}

impl TickFrame {
    pub fn new(tick: u64, agents: Vec<AgentFrame>) -> Self {
        let infected_count = agents.iter().filter(|a| a.infected).count();
        Self {
            tick,
            infected_count,
            agents,
        }
    }

    pub fn agent(&self, agent_id: &str) -> Option<&AgentFrame> {
        self.agents.iter().find(|a| a.agent_id == agent_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub kind: EdgeKind,
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSnapshot {
    pub kind: BuildingKind,
    pub position: Point,
    pub facing: Facing,
    pub yaw: f32,
}

/// Static layout of the town: buildings plus every graph edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CitySnapshot {
    pub grid_size: u32,
    pub block_size: f32,
    #[serde(default)]
    pub buildings: Vec<BuildingSnapshot>,
    #[serde(default)]
    pub edges: Vec<EdgeSnapshot>,
}

impl CitySnapshot {
    pub fn road_count(&self) -> usize {
        self.edges.iter().filter(|e| e.kind == EdgeKind::Road).count()
    }

    pub fn connector_count(&self) -> usize {
        self.edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Connector)
            .count()
    }
}
