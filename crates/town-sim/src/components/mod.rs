//! ECS Components
//!
//! Entity components for agents plus the graph and session resources.

pub mod agent;
pub mod graph;
pub mod world;

pub use agent::*;
pub use graph::*;
pub use world::*;
