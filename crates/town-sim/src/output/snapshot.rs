//! Frame Capture
//!
//! Collects the renderer-facing state of every agent after a tick.

use bevy_ecs::prelude::*;
use std::fs;
use std::path::Path;
use town_events::{AgentFrame, AgentStatus, CitySnapshot, TickFrame};

use crate::components::agent::{AgentId, FreeWalk, Infection, PathFollower, Position};
use crate::components::world::SimClock;
use crate::error::OutputError;

/// Snapshot all agents, sorted by ID.
pub fn capture_frame(world: &mut World) -> TickFrame {
    let tick = world.resource::<SimClock>().current_tick;

    let mut query = world.query::<(
        &AgentId,
        &Position,
        &Infection,
        Option<&PathFollower>,
        Option<&FreeWalk>,
    )>();

    let mut agents: Vec<AgentFrame> = query
        .iter(world)
        .map(|(id, position, infection, follower, walker)| {
            let status = match (follower, walker) {
                (Some(f), _) => f.status(),
                (None, Some(_)) => AgentStatus::Wandering,
                (None, None) => AgentStatus::Idle,
            };
            AgentFrame {
                agent_id: id.0.clone(),
                position: position.0,
                infected: infection.is_infected(),
                status,
            }
        })
        .collect();
    agents.sort_by(|a, b| a.agent_id.cmp(&b.agent_id));

    TickFrame::new(tick, agents)
}

/// Write the town layout as pretty JSON.
pub fn write_city(city: &CitySnapshot, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(city)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use town_events::Point;

    #[test]
    fn test_capture_frame_statuses() {
        use crate::components::agent::ArrivalPolicy;

        let mut world = World::new();
        world.insert_resource(SimClock { current_tick: 4 });

        world.spawn((
            AgentId("blob_0001".into()),
            Position(Point::planar(1.0, 0.0)),
            Infection::seeded(),
            FreeWalk,
        ));
        world.spawn((
            AgentId("blob_0000".into()),
            Position(Point::planar(0.0, 0.0)),
            Infection::healthy(),
            PathFollower::idle(ArrivalPolicy::Idle),
        ));

        let frame = capture_frame(&mut world);
        assert_eq!(frame.tick, 4);
        assert_eq!(frame.infected_count, 1);
        assert_eq!(frame.agents[0].agent_id, "blob_0000");
        assert_eq!(frame.agents[0].status, AgentStatus::Idle);
        assert_eq!(frame.agents[1].status, AgentStatus::Wandering);
    }

    #[test]
    fn test_write_city() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("city.json");
        let city = CitySnapshot {
            grid_size: 2,
            block_size: 10.0,
            ..CitySnapshot::default()
        };

        write_city(&city, &path).unwrap();
        let parsed: CitySnapshot = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, city);
    }
}
