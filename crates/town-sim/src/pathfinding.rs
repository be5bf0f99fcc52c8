//! Path Finder
//!
//! Unweighted breadth-first search over the road graph. Routes are minimal
//! in hop count; among equal-hop routes the one whose edges were registered
//! first wins.

use std::collections::{HashMap, HashSet, VecDeque};
use town_events::Point;

use crate::components::graph::{Edge, EdgeId, NodeKey, RoadGraph};
use crate::error::PathError;

/// An ordered list of edges, each oriented in the direction of travel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Route {
    edges: Vec<Edge>,
}

impl Route {
    pub fn new(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn hops(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn start(&self) -> Option<Point> {
        self.edges.first().map(|e| e.start)
    }

    pub fn end(&self) -> Option<Point> {
        self.edges.last().map(|e| e.end)
    }

    /// Geometric length of the route.
    pub fn length(&self) -> f32 {
        self.edges.iter().map(Edge::length).sum()
    }

    /// The way back: edges in reverse order, each flipped.
    pub fn reversed(&self) -> Route {
        Route {
            edges: self.edges.iter().rev().map(Edge::reversed).collect(),
        }
    }
}

/// Bookkeeping from one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Nodes pushed onto the frontier (the start node included)
    pub enqueued: usize,
    /// Nodes popped and expanded
    pub expanded: usize,
}

/// Find the fewest-hop route from `start` to `target`.
pub fn find_path(graph: &RoadGraph, start: Point, target: Point) -> Result<Route, PathError> {
    find_path_traced(graph, start, target).0
}

/// As [`find_path`], also reporting how much of the graph was touched.
pub fn find_path_traced(
    graph: &RoadGraph,
    start: Point,
    target: Point,
) -> (Result<Route, PathError>, SearchStats) {
    let mut stats = SearchStats::default();
    let start_key = graph.key(&start);
    let target_key = graph.key(&target);

    if start_key == target_key {
        return (Ok(Route::default()), stats);
    }
    if graph.is_empty() {
        return (Err(PathError::EmptyGraph), stats);
    }

    let no_path = PathError::NoPathFound {
        from: start,
        to: target,
    };
    if !graph.contains(&start) || !graph.contains(&target) {
        return (Err(no_path), stats);
    }

    // node -> (previous node, edge used, walked forward)
    let mut came_from: HashMap<NodeKey, (NodeKey, EdgeId, bool)> = HashMap::new();
    let mut visited: HashSet<NodeKey> = HashSet::new();
    let mut frontier: VecDeque<NodeKey> = VecDeque::new();

    visited.insert(start_key);
    frontier.push_back(start_key);
    stats.enqueued += 1;

    while let Some(node) = frontier.pop_front() {
        stats.expanded += 1;

        if node == target_key {
            return (Ok(rebuild_route(graph, &came_from, start_key, node)), stats);
        }

        for incidence in graph.incident_to(&node) {
            let Some(edge) = graph.edge(incidence.edge) else {
                continue;
            };
            let next = if incidence.forward {
                graph.key(&edge.end)
            } else {
                graph.key(&edge.start)
            };

            if visited.insert(next) {
                came_from.insert(next, (node, incidence.edge, incidence.forward));
                frontier.push_back(next);
                stats.enqueued += 1;
            }
        }
    }

    tracing::debug!(
        "frontier exhausted after {} nodes: {} -> {}",
        stats.expanded,
        start,
        target
    );
    (Err(no_path), stats)
}

fn rebuild_route(
    graph: &RoadGraph,
    came_from: &HashMap<NodeKey, (NodeKey, EdgeId, bool)>,
    start: NodeKey,
    target: NodeKey,
) -> Route {
    let mut edges = Vec::new();
    let mut node = target;

    while node != start {
        let Some(&(previous, edge_id, forward)) = came_from.get(&node) else {
            break;
        };
        if let Some(edge) = graph.edge(edge_id) {
            edges.push(if forward { *edge } else { edge.reversed() });
        }
        node = previous;
    }

    edges.reverse();
    Route::new(edges)
}
