//! Error Types
//!
//! None of these are fatal to the host: path failures skip a spawn, config
//! failures stop a session from starting.

use thiserror::Error;
use town_events::Point;

/// Why a path request produced no route.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("no edges registered")]
    EmptyGraph,
    #[error("no path from {from} to {to}")]
    NoPathFound { from: Point, to: Point },
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors writing frames or layouts to disk.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
