//! Shared data types for the blobtown simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Everything here is what the core hands to a renderer or writes to disk.

pub mod event;
pub mod point;
pub mod snapshot;

pub use event::{SimEvent, SessionHeader};
pub use point::Point;
pub use snapshot::{
    AgentFrame, AgentStatus, BuildingKind, BuildingSnapshot, CitySnapshot, EdgeKind,
    EdgeSnapshot, Facing, TickFrame,
};
