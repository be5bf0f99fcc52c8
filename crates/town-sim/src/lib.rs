//! Blobtown Simulation Engine Library
//!
//! A grid town of buildings joined by roads, with two agent populations:
//! random-walking blobs spreading an infection, and commuters following
//! shortest-hop routes between building doors.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod output;
pub mod pathfinding;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::*;
pub use config::{Config, Variant};
pub use error::{ConfigError, OutputError, PathError};
pub use pathfinding::{find_path, find_path_traced, Route, SearchStats};
pub use simulation::{Session, Simulation};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
