//! Road Graph
//!
//! The registry of traversable edges (roads and building connectors) and the
//! node index used for neighbour expansion.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use town_events::{EdgeKind, EdgeSnapshot, Point};

/// Default tolerance used when matching edge endpoints.
pub const DEFAULT_COORD_TOLERANCE: f32 = 1e-3;

/// Index of an edge in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// A traversable segment. Undirected for path search; `start`/`end` only
/// record how it was registered (or, inside a route, the travel direction).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(start: Point, end: Point, kind: EdgeKind) -> Self {
        Self { start, end, kind }
    }

    pub fn road(start: Point, end: Point) -> Self {
        Self::new(start, end, EdgeKind::Road)
    }

    pub fn connector(start: Point, end: Point) -> Self {
        Self::new(start, end, EdgeKind::Connector)
    }

    /// The same segment walked the other way.
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            kind: self.kind,
        }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(&self.end)
    }

    /// Position at `t` in `[0, 1]` along the edge.
    pub fn point_at(&self, t: f32) -> Point {
        self.start.lerp(&self.end, t.clamp(0.0, 1.0))
    }

    pub fn to_snapshot(&self) -> EdgeSnapshot {
        EdgeSnapshot {
            kind: self.kind,
            start: self.start,
            end: self.end,
        }
    }
}

/// Ground-plane coordinates quantised by the graph tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub x: i64,
    pub z: i64,
}

impl NodeKey {
    pub fn from_point(point: &Point, tolerance: f32) -> Self {
        Self {
            x: (point.x / tolerance).round() as i64,
            z: (point.z / tolerance).round() as i64,
        }
    }
}

/// An edge touching a node, and whether leaving the node walks it forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incidence {
    pub edge: EdgeId,
    pub forward: bool,
}

/// Resource: every edge of the town, read-only once the session starts.
#[derive(Resource, Debug, Clone)]
pub struct RoadGraph {
    edges: Vec<Edge>,
    /// Incident edges per node, in edge insertion order
    nodes: HashMap<NodeKey, Vec<Incidence>>,
    tolerance: f32,
}

impl Default for RoadGraph {
    fn default() -> Self {
        Self::new(DEFAULT_COORD_TOLERANCE)
    }
}

impl RoadGraph {
    pub fn new(tolerance: f32) -> Self {
        Self {
            edges: Vec::new(),
            nodes: HashMap::new(),
            tolerance,
        }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn key(&self, point: &Point) -> NodeKey {
        NodeKey::from_point(point, self.tolerance)
    }

    /// Append an edge. Duplicates are kept.
    pub fn add_edge(&mut self, start: Point, end: Point, kind: EdgeKind) -> EdgeId {
        self.push(Edge::new(start, end, kind))
    }

    pub fn push(&mut self, edge: Edge) -> EdgeId {
        let id = EdgeId(self.edges.len());
        let start_key = self.key(&edge.start);
        let end_key = self.key(&edge.end);

        self.nodes.entry(start_key).or_default().push(Incidence {
            edge: id,
            forward: true,
        });
        if end_key != start_key {
            self.nodes.entry(end_key).or_default().push(Incidence {
                edge: id,
                forward: false,
            });
        }

        self.edges.push(edge);
        id
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    /// All edges in insertion order. The iterator is cheap to clone and can
    /// be restarted by calling this again.
    pub fn all_edges(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// A uniformly random edge, or `None` if nothing is registered.
    pub fn random_edge<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Edge> {
        self.edges.choose(rng)
    }

    /// A uniformly random edge of one kind.
    pub fn random_edge_of<R: Rng + ?Sized>(&self, kind: EdgeKind, rng: &mut R) -> Option<&Edge> {
        let candidates: Vec<&Edge> = self.edges_of(kind).collect();
        candidates.choose(rng).copied()
    }

    /// Edges leaving the node at `point`, in insertion order.
    pub fn incident(&self, point: &Point) -> &[Incidence] {
        self.incident_to(&self.key(point))
    }

    pub fn incident_to(&self, key: &NodeKey) -> &[Incidence] {
        self.nodes.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.nodes.contains_key(&self.key(point))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn to_snapshots(&self) -> Vec<EdgeSnapshot> {
        self.edges.iter().map(Edge::to_snapshot).collect()
    }
}
