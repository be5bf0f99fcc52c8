//! ECS Systems
//!
//! Per-tick systems. [`tick_schedule`] wires them in the required order:
//! every position is updated before the infection pass reads them.

pub mod infection;
pub mod movement;
pub mod traffic;

use bevy_ecs::prelude::*;

pub use infection::{spread_infection, update_infections, Contact, Transmission};
pub use movement::{follow_paths, free_walk, random_step};
pub use traffic::{advance_clock, drain_arrivals};

/// The schedule run once per tick.
pub fn tick_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            advance_clock,
            drain_arrivals,
            free_walk,
            follow_paths,
            spread_infection,
        )
            .chain(),
    );
    schedule
}
