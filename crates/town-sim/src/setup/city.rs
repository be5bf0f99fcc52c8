//! City Setup
//!
//! Lays out a square grid of blocks with four buildings each, the roads
//! around every block and a connector from each building door to the road
//! it faces.
//!
//! Every grid line is emitted exactly once. Lines that buildings face are
//! split at the connector x-coordinates so each connector ends on a road
//! node rather than in the middle of a road segment.

use town_events::{
    BuildingKind, BuildingSnapshot, CitySnapshot, EdgeKind, Facing, Point,
};

use crate::components::graph::{EdgeId, RoadGraph};
use crate::config::CityConfig;

/// A building and the connector edge leading from its door.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub kind: BuildingKind,
    pub position: Point,
    pub facing: Facing,
    pub connector: EdgeId,
}

impl Building {
    pub fn to_snapshot(&self) -> BuildingSnapshot {
        BuildingSnapshot {
            kind: self.kind,
            position: self.position,
            facing: self.facing,
            yaw: self.facing.yaw(),
        }
    }
}

/// Generated town: buildings plus the road graph.
#[derive(Debug, Clone)]
pub struct CityLayout {
    pub grid_size: u32,
    pub block_size: f32,
    pub buildings: Vec<Building>,
    pub graph: RoadGraph,
}

impl CityLayout {
    /// Door points, i.e. the building end of every connector.
    pub fn doors(&self) -> Vec<Point> {
        self.buildings
            .iter()
            .filter_map(|b| self.graph.edge(b.connector).map(|e| e.start))
            .collect()
    }

    pub fn to_snapshot(&self) -> CitySnapshot {
        CitySnapshot {
            grid_size: self.grid_size,
            block_size: self.block_size,
            buildings: self.buildings.iter().map(Building::to_snapshot).collect(),
            edges: self.graph.to_snapshots(),
        }
    }
}

/// Block centre coordinate for grid index `i`.
fn block_center(i: u32, config: &CityConfig) -> f32 {
    let middle = (config.grid_size - 1) as f32 * config.block_size / 2.0;
    i as f32 * config.block_size - middle
}

/// The four buildings of a block: offsets from the centre, model and facing.
fn block_buildings(offset: f32) -> [(f32, f32, BuildingKind, Facing); 4] {
    [
        (-offset, offset, BuildingKind::Flat, Facing::PositiveZ),
        (offset, offset, BuildingKind::Flat2, Facing::PositiveZ),
        (-offset, -offset, BuildingKind::House, Facing::NegativeZ),
        (offset, -offset, BuildingKind::Flat, Facing::NegativeZ),
    ]
}

/// Build the town described by `config`.
pub fn create_city(config: &CityConfig, tolerance: f32) -> CityLayout {
    let mut graph = RoadGraph::new(tolerance);
    if config.grid_size == 0 {
        return CityLayout {
            grid_size: 0,
            block_size: config.block_size,
            buildings: Vec::new(),
            graph,
        };
    }

    let y = config.road_elevation;
    let half = config.block_size / 2.0;
    let offset = config.building_offset;

    // Horizontal lines: one per block row boundary, split at door x-coords
    for j in 0..=config.grid_size {
        let z = if j == config.grid_size {
            block_center(j - 1, config) + half
        } else {
            block_center(j, config) - half
        };
        for i in 0..config.grid_size {
            let cx = block_center(i, config);
            let stops = [cx - half, cx - offset, cx + offset, cx + half];
            for pair in stops.windows(2) {
                if (pair[1] - pair[0]).abs() < tolerance {
                    continue;
                }
                graph.add_edge(
                    Point::new(pair[0], y, z),
                    Point::new(pair[1], y, z),
                    EdgeKind::Road,
                );
            }
        }
    }

    // Vertical lines: one segment per block
    for i in 0..=config.grid_size {
        let x = if i == config.grid_size {
            block_center(i - 1, config) + half
        } else {
            block_center(i, config) - half
        };
        for j in 0..config.grid_size {
            let cz = block_center(j, config);
            graph.add_edge(
                Point::new(x, y, cz - half),
                Point::new(x, y, cz + half),
                EdgeKind::Road,
            );
        }
    }

    // Buildings and their connectors
    let mut buildings = Vec::new();
    for i in 0..config.grid_size {
        for j in 0..config.grid_size {
            let cx = block_center(i, config);
            let cz = block_center(j, config);

            for (dx, dz, kind, facing) in block_buildings(offset) {
                let position = Point::planar(cx + dx, cz + dz);
                let road_z = match facing {
                    Facing::PositiveZ => cz + half,
                    Facing::NegativeZ => cz - half,
                };
                let connector = graph.add_edge(
                    position.with_y(y),
                    Point::new(position.x, y, road_z),
                    EdgeKind::Connector,
                );
                buildings.push(Building {
                    kind,
                    position,
                    facing,
                    connector,
                });
            }
        }
    }

    tracing::debug!(
        "Created {}x{} city: {} buildings, {} edges, {} nodes",
        config.grid_size,
        config.grid_size,
        buildings.len(),
        graph.len(),
        graph.node_count()
    );

    CityLayout {
        grid_size: config.grid_size,
        block_size: config.block_size,
        buildings,
        graph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::find_path;

    fn single_block() -> CityConfig {
        CityConfig {
            grid_size: 1,
            ..CityConfig::default()
        }
    }

    #[test]
    fn test_single_block_counts() {
        let city = create_city(&single_block(), 1e-3);

        assert_eq!(city.buildings.len(), 4);
        // Two horizontal lines in three pieces, two vertical lines
        assert_eq!(city.graph.edges_of(EdgeKind::Road).count(), 8);
        assert_eq!(city.graph.edges_of(EdgeKind::Connector).count(), 4);
        // 4 corners + 4 attachment points + 4 doors
        assert_eq!(city.graph.node_count(), 12);
    }

    #[test]
    fn test_default_city_counts() {
        let city = create_city(&CityConfig::default(), 1e-3);
        let n = 5;

        assert_eq!(city.buildings.len(), 4 * n * n);
        // (n + 1) horizontal lines of 3n pieces, (n + 1) vertical lines of n
        let roads = (n + 1) * 3 * n + (n + 1) * n;
        assert_eq!(city.graph.edges_of(EdgeKind::Road).count(), roads);
        assert_eq!(city.graph.edges_of(EdgeKind::Connector).count(), 4 * n * n);
    }

    #[test]
    fn test_grid_is_centered() {
        let city = create_city(&CityConfig::default(), 1e-3);
        let xs: Vec<f32> = city.buildings.iter().map(|b| b.position.x).collect();
        let min = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!((min + max).abs() < 1e-4);
        assert!((min - (-21.5)).abs() < 1e-4);
    }

    #[test]
    fn test_connectors_end_on_road_nodes() {
        let city = create_city(&CityConfig::default(), 1e-3);

        for building in &city.buildings {
            let connector = city.graph.edge(building.connector).unwrap();
            let roads_here = city
                .graph
                .incident(&connector.end)
                .iter()
                .filter(|inc| city.graph.edge(inc.edge).unwrap().kind == EdgeKind::Road)
                .count();
            assert!(roads_here >= 2, "connector at {} is a dead end", connector.end);
        }
    }

    #[test]
    fn test_connector_faces_its_road() {
        let city = create_city(&single_block(), 1e-3);
        for building in &city.buildings {
            let connector = city.graph.edge(building.connector).unwrap();
            assert_eq!(connector.start.x, connector.end.x);
            match building.facing {
                Facing::PositiveZ => assert_eq!(connector.end.z, 5.0),
                Facing::NegativeZ => assert_eq!(connector.end.z, -5.0),
            }
        }
    }

    #[test]
    fn test_every_door_reaches_every_other() {
        let city = create_city(&CityConfig::default(), 1e-3);
        let doors = city.doors();
        let first = doors[0];

        for door in &doors[1..] {
            let route = find_path(&city.graph, first, *door).unwrap();
            assert!(route.hops() >= 2);
            assert_eq!(route.edges()[0].kind, EdgeKind::Connector);
            assert_eq!(route.edges()[route.hops() - 1].kind, EdgeKind::Connector);
        }
    }

    #[test]
    fn test_snapshot_export() {
        let city = create_city(&single_block(), 1e-3);
        let snapshot = city.to_snapshot();
        assert_eq!(snapshot.buildings.len(), 4);
        assert_eq!(snapshot.road_count(), 8);
        assert_eq!(snapshot.connector_count(), 4);
        assert_eq!(snapshot.buildings[2].kind, BuildingKind::House);
    }
}
