//! Movement Systems
//!
//! Free-walk random steps with boundary clamping, and interpolation along
//! assigned routes.

use bevy_ecs::prelude::*;
use rand::Rng;
use town_events::Point;

use crate::components::agent::{FreeWalk, PathFollower, Position};
use crate::components::world::{Bounds, SimParams};
use crate::SimRng;

/// Displace x and z independently by up to `max_step`, then clamp.
pub fn random_step<R: Rng + ?Sized>(point: &mut Point, max_step: f32, bounds: &Bounds, rng: &mut R) {
    point.x += rng.gen_range(-max_step..=max_step);
    point.z += rng.gen_range(-max_step..=max_step);
    bounds.clamp(point);
}

/// System: one random step for every free-walking agent
pub fn free_walk(
    params: Res<SimParams>,
    mut rng: ResMut<SimRng>,
    mut query: Query<&mut Position, With<FreeWalk>>,
) {
    let rng = &mut rng.0;
    for mut position in query.iter_mut() {
        random_step(&mut position.0, params.max_step, &params.bounds, rng);
    }
}

/// System: advance every traversing agent along its route
pub fn follow_paths(params: Res<SimParams>, mut query: Query<(&mut Position, &mut PathFollower)>) {
    for (mut position, mut follower) in query.iter_mut() {
        if let Some(next) = follower.advance(params.progress_rate) {
            position.0 = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::{ArrivalPolicy, TravelState};
    use crate::components::graph::Edge;
    use crate::pathfinding::Route;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_step_stays_within_step() {
        let mut rng = SmallRng::seed_from_u64(3);
        let bounds = Bounds::square(20.0);
        let mut point = Point::new(0.0, 0.5, 0.0);

        for _ in 0..1000 {
            let before = point;
            random_step(&mut point, 0.05, &bounds, &mut rng);
            assert!((point.x - before.x).abs() <= 0.05 + 1e-6);
            assert!((point.z - before.z).abs() <= 0.05 + 1e-6);
            assert_eq!(point.y, 0.5);
        }
    }

    #[test]
    fn test_random_step_clamps_at_edge() {
        let mut rng = SmallRng::seed_from_u64(4);
        let bounds = Bounds::square(1.0);
        let mut point = Point::planar(1.0, -1.0);

        for _ in 0..500 {
            random_step(&mut point, 0.8, &bounds, &mut rng);
            assert!(bounds.contains(&point));
        }
    }

    #[test]
    fn test_free_walk_system_moves_only_walkers() {
        let mut world = World::new();
        world.insert_resource(SimParams::default());
        world.insert_resource(SimRng(SmallRng::seed_from_u64(9)));

        let walker = world.spawn((Position(Point::planar(0.0, 0.0)), FreeWalk)).id();
        let parked = world.spawn(Position(Point::planar(0.0, 0.0))).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(free_walk);
        for _ in 0..10 {
            schedule.run(&mut world);
        }

        let walked = world.entity(walker).get::<Position>().unwrap().0;
        let still = world.entity(parked).get::<Position>().unwrap().0;
        assert_ne!(walked, Point::planar(0.0, 0.0));
        assert_eq!(still, Point::planar(0.0, 0.0));
    }

    #[test]
    fn test_follow_paths_system() {
        let mut world = World::new();
        world.insert_resource(SimParams {
            progress_rate: 0.5,
            ..SimParams::default()
        });

        let route = Route::new(vec![Edge::road(Point::planar(0.0, 0.0), Point::planar(2.0, 0.0))]);
        let agent = world
            .spawn((
                Position(Point::planar(0.0, 0.0)),
                PathFollower::traversing(route, ArrivalPolicy::Idle),
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(follow_paths);

        schedule.run(&mut world);
        assert_eq!(world.entity(agent).get::<Position>().unwrap().0, Point::planar(1.0, 0.0));

        schedule.run(&mut world);
        let entity = world.entity(agent);
        assert_eq!(entity.get::<Position>().unwrap().0, Point::planar(2.0, 0.0));
        assert_eq!(entity.get::<PathFollower>().unwrap().state(), TravelState::Arrived);
    }
}
