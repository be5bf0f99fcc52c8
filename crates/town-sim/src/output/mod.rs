//! Output Module
//!
//! Frame capture and layout export for the renderer.

pub mod snapshot;

pub use snapshot::{capture_frame, write_city};
