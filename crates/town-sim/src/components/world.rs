//! World Components
//!
//! Session-wide resources: the tick clock, the rectangular walking area and
//! the tuning values the systems read every tick.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use town_events::Point;

use crate::error::ConfigError;

/// Resource: the current tick, advanced once per schedule run
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimClock {
    pub current_tick: u64,
}

impl SimClock {
    pub fn advance(&mut self) {
        self.current_tick += 1;
    }
}

/// Axis-aligned rectangle on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::square(20.0)
    }
}

impl Bounds {
    /// `[-half, half]` on both axes.
    pub fn square(half: f32) -> Self {
        Self {
            min_x: -half,
            max_x: half,
            min_z: -half,
            max_z: half,
        }
    }

    pub fn contains(&self, point: &Point) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_z..=self.max_z).contains(&point.z)
    }

    pub fn clamp(&self, point: &mut Point) {
        point.x = point.x.clamp(self.min_x, self.max_x);
        point.z = point.z.clamp(self.min_z, self.max_z);
    }

    pub fn is_valid(&self) -> bool {
        self.min_x < self.max_x && self.min_z < self.max_z
    }
}

/// Resource: validated per-tick tuning
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    /// Largest free-walk displacement per axis per tick
    pub max_step: f32,
    pub bounds: Bounds,
    /// Infection spreads strictly below this distance
    pub contact_radius: f32,
    /// Fraction of an edge covered per tick in path-follow mode
    pub progress_rate: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            max_step: 0.05,
            bounds: Bounds::default(),
            contact_radius: 1.0,
            progress_rate: 0.02,
        }
    }
}

impl SimParams {
    /// Reject tuning the systems cannot run with. Field names follow the
    /// tuning file sections the values are read from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("outbreak.max_step", self.max_step)?;
        positive("outbreak.contact_radius", self.contact_radius)?;
        positive("commute.progress_rate", self.progress_rate)?;

        if self.progress_rate > 1.0 {
            return Err(ConfigError::invalid(
                "commute.progress_rate",
                format!("must be at most 1.0, got {}", self.progress_rate),
            ));
        }
        if !self.bounds.is_valid() {
            return Err(ConfigError::invalid(
                "outbreak.bounds",
                "min must be below max on both axes",
            ));
        }
        Ok(())
    }
}

pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_clamp() {
        let bounds = Bounds::square(20.0);
        let mut p = Point::new(25.0, 0.5, -30.0);
        assert!(!bounds.contains(&p));

        bounds.clamp(&mut p);
        assert_eq!(p, Point::new(20.0, 0.5, -20.0));
        assert!(bounds.contains(&p));
    }

    #[test]
    fn test_bounds_validity() {
        assert!(Bounds::default().is_valid());
        let flat = Bounds {
            min_x: 1.0,
            max_x: 1.0,
            min_z: 0.0,
            max_z: 2.0,
        };
        assert!(!flat.is_valid());
    }

    #[test]
    fn test_params_validation() {
        assert!(SimParams::default().validate().is_ok());

        let backwards = SimParams {
            max_step: -0.1,
            ..SimParams::default()
        };
        assert!(matches!(
            backwards.validate(),
            Err(ConfigError::Invalid { field: "outbreak.max_step", .. })
        ));

        let parked = SimParams {
            progress_rate: 0.0,
            ..SimParams::default()
        };
        assert!(matches!(
            parked.validate(),
            Err(ConfigError::Invalid { field: "commute.progress_rate", .. })
        ));

        let leaping = SimParams {
            progress_rate: 1.5,
            ..SimParams::default()
        };
        assert!(leaping.validate().is_err());
    }

    #[test]
    fn test_clock_advances() {
        let mut clock = SimClock::default();
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, 2);
    }
}
