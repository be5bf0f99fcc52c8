//! Traffic Systems
//!
//! Clock advance and arrival handling for path-following agents.

use bevy_ecs::prelude::*;
use town_events::SimEvent;

use crate::components::agent::{AgentId, PathFollower, Position, TravelState};
use crate::components::world::SimClock;
use crate::events::TickEvents;

/// System: start a new tick
pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.advance();
}

/// System: report arrivals from the previous tick, then apply each agent's
/// arrival policy (turn around or go idle)
pub fn drain_arrivals(
    clock: Res<SimClock>,
    mut events: ResMut<TickEvents>,
    mut query: Query<(&AgentId, &Position, &mut PathFollower)>,
) {
    for (agent_id, position, mut follower) in query.iter_mut() {
        if follower.state() != TravelState::Arrived {
            continue;
        }

        events.push(SimEvent::Arrived {
            tick: clock.current_tick,
            agent_id: agent_id.0.clone(),
            position: position.0,
            arrivals: follower.arrivals(),
        });
        follower.drain_arrival();
        tracing::debug!(
            "{} arrived at {} (now {:?})",
            agent_id.0,
            position.0,
            follower.state()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::ArrivalPolicy;
    use crate::components::graph::Edge;
    use crate::pathfinding::Route;
    use town_events::Point;

    #[test]
    fn test_drain_turns_agent_around() {
        let mut world = World::new();
        world.insert_resource(SimClock { current_tick: 8 });
        world.insert_resource(TickEvents::new());

        let route = Route::new(vec![Edge::road(Point::planar(0.0, 0.0), Point::planar(1.0, 0.0))]);
        let mut follower = PathFollower::traversing(route, ArrivalPolicy::ReturnOnce);
        follower.advance(1.0);

        let agent = world
            .spawn((AgentId("commuter_0000".into()), Position(Point::planar(1.0, 0.0)), follower))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(drain_arrivals);
        schedule.run(&mut world);

        let follower = world.entity(agent).get::<PathFollower>().unwrap();
        assert_eq!(follower.state(), TravelState::Traversing);
        assert_eq!(follower.route().start(), Some(Point::planar(1.0, 0.0)));

        let events = world.resource_mut::<TickEvents>().drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SimEvent::Arrived { tick: 8, arrivals: 1, .. }));

        // Already drained; a second run reports nothing
        schedule.run(&mut world);
        assert!(world.resource::<TickEvents>().is_empty());
    }

    #[test]
    fn test_advance_clock() {
        let mut world = World::new();
        world.insert_resource(SimClock::default());
        let mut schedule = Schedule::default();
        schedule.add_systems(advance_clock);
        schedule.run(&mut world);
        schedule.run(&mut world);
        assert_eq!(world.resource::<SimClock>().current_tick, 2);
    }
}
