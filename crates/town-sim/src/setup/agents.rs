//! Agent Spawning
//!
//! Functions to spawn free-walking blobs and path-following commuters.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;
use town_events::{Point, SimEvent};

use crate::components::agent::{
    Agent, AgentCounter, ArrivalPolicy, FreeWalk, Infection, PathFollower, Position,
};
use crate::components::world::{Bounds, SimClock};
use crate::config::OutbreakConfig;
use crate::events::TickEvents;
use crate::pathfinding::Route;

/// A uniformly random point inside `bounds` at height `y`.
pub fn random_position(bounds: &Bounds, y: f32, rng: &mut SmallRng) -> Point {
    Point::new(
        rng.gen_range(bounds.min_x..=bounds.max_x),
        y,
        rng.gen_range(bounds.min_z..=bounds.max_z),
    )
}

fn record_spawn(world: &mut World, agent_id: String, position: Point, infected: bool) {
    let tick = world.resource::<SimClock>().current_tick;
    world.resource_mut::<TickEvents>().push(SimEvent::Spawned {
        tick,
        agent_id,
        position,
        infected,
    });
}

/// Spawn one free-walking blob.
pub fn spawn_blob(world: &mut World, position: Point, infected: bool) -> Entity {
    let agent_id = world.resource_mut::<AgentCounter>().next_id("blob");
    let name = agent_id.0.clone();

    let entity = world
        .spawn((
            Agent,
            agent_id,
            Position(position),
            Infection::new(infected),
            FreeWalk,
        ))
        .id();

    record_spawn(world, name, position, infected);
    entity
}

/// Spawn the outbreak population; the first `initial_infected` are seeds.
pub fn spawn_outbreak(world: &mut World, config: &OutbreakConfig, rng: &mut SmallRng) -> Vec<Entity> {
    (0..config.population)
        .map(|i| {
            let position = random_position(&config.bounds, config.blob_radius, rng);
            spawn_blob(world, position, i < config.initial_infected)
        })
        .collect()
}

/// Spawn a commuter already traversing `route`.
pub fn spawn_commuter(world: &mut World, route: Route, policy: ArrivalPolicy) -> Entity {
    let agent_id = world.resource_mut::<AgentCounter>().next_id("commuter");
    let name = agent_id.0.clone();
    let position = route.start().unwrap_or_default();

    let entity = world
        .spawn((
            Agent,
            agent_id,
            Position(position),
            Infection::healthy(),
            PathFollower::traversing(route, policy),
        ))
        .id();

    record_spawn(world, name, position, false);
    entity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::AgentId;
    use rand::SeedableRng;

    fn test_world() -> World {
        let mut world = World::new();
        world.insert_resource(AgentCounter::new());
        world.insert_resource(SimClock::default());
        world.insert_resource(TickEvents::new());
        world
    }

    #[test]
    fn test_spawn_outbreak_seeds_first_agents() {
        let mut world = test_world();
        let mut rng = SmallRng::seed_from_u64(42);
        let config = OutbreakConfig {
            population: 20,
            initial_infected: 3,
            ..OutbreakConfig::default()
        };

        let entities = spawn_outbreak(&mut world, &config, &mut rng);
        assert_eq!(entities.len(), 20);

        let mut query = world.query::<(&AgentId, &Position, &Infection)>();
        let mut infected = 0;
        for (id, position, infection) in query.iter(&world) {
            assert!(config.bounds.contains(&position.0));
            assert_eq!(position.0.y, config.blob_radius);
            if infection.is_infected() {
                infected += 1;
                assert!(["blob_0000", "blob_0001", "blob_0002"].contains(&id.0.as_str()));
            }
        }
        assert_eq!(infected, 3);
        assert_eq!(world.resource::<TickEvents>().len(), 20);
    }

    #[test]
    fn test_spawn_commuter_starts_at_route_start() {
        use crate::components::graph::Edge;

        let mut world = test_world();
        let route = Route::new(vec![Edge::connector(
            Point::planar(1.0, 1.0),
            Point::planar(1.0, 5.0),
        )]);
        let entity = spawn_commuter(&mut world, route, ArrivalPolicy::ReturnOnce);

        let agent = world.entity(entity);
        assert_eq!(agent.get::<AgentId>().unwrap().0, "commuter_0000");
        assert_eq!(agent.get::<Position>().unwrap().0, Point::planar(1.0, 1.0));
        assert!(agent.get::<FreeWalk>().is_none());
    }
}
