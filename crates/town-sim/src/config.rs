//! Configuration System
//!
//! Loads tuning parameters from tuning.toml for easy adjustment without
//! recompiling. Every section falls back to defaults when omitted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::components::agent::ArrivalPolicy;
use crate::components::graph::DEFAULT_COORD_TOLERANCE;
use crate::components::world::{positive, Bounds, SimParams};
use crate::error::ConfigError;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Which population a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Random-walking blobs spreading an infection
    #[default]
    Outbreak,
    /// Commuters travelling between building doors along the roads
    Commute,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Outbreak => "outbreak",
            Variant::Commute => "commute",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outbreak" => Ok(Variant::Outbreak),
            "commute" => Ok(Variant::Commute),
            other => Err(format!("unknown variant '{}'", other)),
        }
    }
}

/// Top-level configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub city: CityConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub outbreak: OutbreakConfig,
    #[serde(default)]
    pub commute: CommuteConfig,
}

/// Simulation run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub ticks: u64,
    pub variant: Variant,
    /// Ticks between frames written to the frame log
    pub snapshot_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 2000,
            variant: Variant::Outbreak,
            snapshot_interval: 60,
        }
    }
}

/// Town layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// Blocks per side
    pub grid_size: u32,
    /// Side length of one block
    pub block_size: f32,
    /// Distance of each building from its block centre on both axes
    pub building_offset: f32,
    /// Height at which road and connector lines sit
    pub road_elevation: f32,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            grid_size: 5,
            block_size: 10.0,
            building_offset: 1.5,
            road_elevation: 0.19,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Endpoints closer than this on x and z are the same node
    pub coordinate_tolerance: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            coordinate_tolerance: DEFAULT_COORD_TOLERANCE,
        }
    }
}

/// Free-walk blobs and infection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutbreakConfig {
    pub population: usize,
    pub initial_infected: usize,
    pub blob_radius: f32,
    pub max_step: f32,
    pub contact_radius: f32,
    pub bounds: Bounds,
}

impl Default for OutbreakConfig {
    fn default() -> Self {
        Self {
            population: 50,
            initial_infected: 1,
            blob_radius: 0.5,
            max_step: 0.05,
            contact_radius: 1.0,
            bounds: Bounds::square(20.0),
        }
    }
}

/// Path-following commuters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommuteConfig {
    pub commuters: usize,
    pub progress_rate: f32,
    pub arrival: ArrivalPolicy,
}

impl Default for CommuteConfig {
    fn default() -> Self {
        Self {
            commuters: 5,
            progress_rate: 0.02,
            arrival: ArrivalPolicy::ReturnOnce,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_TUNING_PATH).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", DEFAULT_TUNING_PATH, e);
            Self::default()
        })
    }

    /// Reject values that would make the simulation degenerate
    pub fn validate(&self) -> Result<(), ConfigError> {
        let outbreak = &self.outbreak;
        let city = &self.city;

        self.params().validate()?;
        positive("outbreak.blob_radius", outbreak.blob_radius)?;
        positive("graph.coordinate_tolerance", self.graph.coordinate_tolerance)?;
        positive("city.block_size", city.block_size)?;

        if city.grid_size == 0 {
            return Err(ConfigError::invalid("city.grid_size", "must be at least 1"));
        }
        if !(0.0..city.block_size / 2.0).contains(&city.building_offset) {
            return Err(ConfigError::invalid(
                "city.building_offset",
                format!("must lie in [0, {})", city.block_size / 2.0),
            ));
        }
        if outbreak.initial_infected > outbreak.population {
            return Err(ConfigError::invalid(
                "outbreak.initial_infected",
                format!(
                    "{} seeds exceed a population of {}",
                    outbreak.initial_infected, outbreak.population
                ),
            ));
        }
        if self.simulation.snapshot_interval == 0 {
            return Err(ConfigError::invalid(
                "simulation.snapshot_interval",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Per-tick tuning for the systems
    pub fn params(&self) -> SimParams {
        SimParams {
            max_step: self.outbreak.max_step,
            bounds: self.outbreak.bounds,
            contact_radius: self.outbreak.contact_radius,
            progress_rate: self.commute.progress_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.outbreak.population, 50);
        assert_eq!(config.outbreak.initial_infected, 1);
        assert_eq!(config.city.grid_size, 5);
        assert_eq!(config.simulation.variant, Variant::Outbreak);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [simulation]
            variant = "commute"
            seed = 7

            [commute]
            arrival = "shuttle"
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.variant, Variant::Commute);
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.ticks, 2000);
        assert_eq!(config.commute.arrival, ArrivalPolicy::Shuttle);
        assert_eq!(config.commute.commuters, 5);
        assert_eq!(config.outbreak, OutbreakConfig::default());
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let result = Config::from_toml_str("[simulation]\nseed = \"many\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Config::load("definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.toml");
        fs::write(&path, "[outbreak]\npopulation = 120\ninitial_infected = 10\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.outbreak.population, 120);
        assert_eq!(config.outbreak.initial_infected, 10);
    }

    #[test]
    fn test_rejects_non_positive_step_and_radius() {
        let mut config = Config::default();
        config.outbreak.max_step = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "outbreak.max_step", .. })
        ));

        let mut config = Config::default();
        config.outbreak.contact_radius = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "outbreak.contact_radius", .. })
        ));

        let mut config = Config::default();
        config.commute.progress_rate = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inconsistent_values() {
        let mut config = Config::default();
        config.outbreak.initial_infected = 51;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.commute.progress_rate = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.city.grid_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.outbreak.bounds.max_x = -30.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("commute".parse::<Variant>(), Ok(Variant::Commute));
        assert!("plague".parse::<Variant>().is_err());
        assert_eq!(Variant::Outbreak.to_string(), "outbreak");
    }

    #[test]
    fn test_params_from_config() {
        let params = Config::default().params();
        assert_eq!(params.contact_radius, 1.0);
        assert_eq!(params.max_step, 0.05);
        assert_eq!(params.bounds, Bounds::square(20.0));
    }
}
