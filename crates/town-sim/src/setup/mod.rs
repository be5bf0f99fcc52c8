//! Setup Module
//!
//! Town generation and population spawning.

pub mod agents;
pub mod city;

pub use agents::{random_position, spawn_blob, spawn_commuter, spawn_outbreak};
pub use city::{create_city, Building, CityLayout};
