//! Movement tuning surface.
//!
//! A single immutable [`MovementConfig`] is handed to the simulator at construction and
//! validated there, so a bad value fails at startup instead of producing NaN mid-session.
//!
//! # Units
//! - Speeds in meters/second, accelerations in meters/second².
//! - Heights and distances in meters.
//! - Durations and grace periods in seconds.
//! - `wall_jump_angle` in degrees.
//!
//! # Sign convention
//! `gravity` and `wall_jump_gravity_on_wall` are signed accelerations along +Y. `gravity` must
//! be negative and the wall-slide value must not be positive. Jump impulses use `|gravity|`.

use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a [`MovementConfig`] is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{name}` must be a positive duration, got {value}")]
    NonPositiveDuration { name: &'static str, value: f32 },

    #[error("`{name}` must be positive, got {value}")]
    NonPositiveValue { name: &'static str, value: f32 },

    #[error("`{name}` must not be negative, got {value}")]
    NegativeValue { name: &'static str, value: f32 },

    #[error("`{name}` must point down (negative), got {value}")]
    UpwardGravity { name: &'static str, value: f32 },

    #[error("`{name}` must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },

    #[error("`{low_name}` ({low}) must not exceed `{high_name}` ({high})")]
    InvertedRange {
        low_name: &'static str,
        low: f32,
        high_name: &'static str,
        high: f32,
    },

    #[error("failed to parse movement config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read movement config: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // Movement
    pub base_speed: f32,
    pub gravity: f32,
    pub sprint_multiplier: f32,
    pub ground_friction: f32,
    /// Per-tick compounding of `ground_friction` while grounded well above base speed.
    /// `1.0` disables the escalation.
    pub ground_friction_multiplier: f32,
    pub air_friction: f32,
    pub air_control_multiplier: f32,
    /// Hard cap for bunny-hop chaining.
    pub max_speed: f32,

    // Geometry
    pub standing_height: f32,
    pub radius: f32,
    pub spawn_point: [f32; 3],

    // Crouching
    pub crouch_height: f32,
    pub crouch_speed_multiplier: f32,
    pub crouch_transition_duration: f32,

    // Jumping
    pub jump_height: f32,
    /// Reach of the pre-emptive jump probe below the feet.
    pub jump_height_offset: f32,
    /// Reach of the grounded probe below the feet.
    pub ground_offset: f32,

    // Bunny hopping
    pub bunny_hop_multiplier: f32,
    pub bunny_hop_grace_period: f32,

    // Wall jumping
    pub wall_jump_height: f32,
    pub wall_jump_force: f32,
    pub wall_jump_angle: f32,
    pub wall_jump_bunny_hop_multiplier: f32,
    pub wall_jump_disable_directional_control_duration: f32,
    pub wall_jump_apply_force_duration: f32,
    pub wall_jump_gravity_on_wall: f32,
    /// Side probe reach measured from the capsule center.
    pub wall_detection_radius: f32,

    /// Horizontal displacement per tick above which the actor counts as moving.
    pub moving_epsilon: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            base_speed: 6.0,
            gravity: -9.81,
            sprint_multiplier: 1.5,
            ground_friction: 1.0,
            ground_friction_multiplier: 1.0,
            air_friction: 0.1,
            air_control_multiplier: 1.0,
            max_speed: 12.0,

            standing_height: 2.0,
            radius: 0.5,
            spawn_point: [0.0, 1.0, 0.0],

            crouch_height: 1.0,
            crouch_speed_multiplier: 0.5,
            crouch_transition_duration: 0.5,

            jump_height: 1.0,
            jump_height_offset: 0.1,
            ground_offset: 0.1,

            bunny_hop_multiplier: 1.02,
            bunny_hop_grace_period: 0.2,

            wall_jump_height: 1.0,
            wall_jump_force: 8.0,
            wall_jump_angle: 45.0,
            wall_jump_bunny_hop_multiplier: 1.05,
            wall_jump_disable_directional_control_duration: 0.3,
            wall_jump_apply_force_duration: 0.5,
            wall_jump_gravity_on_wall: -2.0,
            wall_detection_radius: 0.75,

            moving_epsilon: 0.01,
        }
    }
}

impl MovementConfig {
    /// Parses a (possibly partial) TOML document; missing fields keep their defaults.
    ///
    /// The result is not validated here; [`crate::MovementSimulator::new`] does that.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    #[inline]
    pub fn spawn_point(&self) -> Vector3<f32> {
        Vector3::from(self.spawn_point)
    }

    /// Vertical launch speed for a jump reaching `height` under this config's gravity.
    #[inline]
    pub fn launch_speed(&self, height: f32) -> f32 {
        (2.0 * height * self.gravity.abs()).sqrt()
    }

    /// Checks every value the simulator divides by, takes a square root of, or relies on
    /// for ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = [
            ("base_speed", self.base_speed),
            ("gravity", self.gravity),
            ("sprint_multiplier", self.sprint_multiplier),
            ("ground_friction", self.ground_friction),
            ("ground_friction_multiplier", self.ground_friction_multiplier),
            ("air_friction", self.air_friction),
            ("air_control_multiplier", self.air_control_multiplier),
            ("max_speed", self.max_speed),
            ("standing_height", self.standing_height),
            ("radius", self.radius),
            ("spawn_point.x", self.spawn_point[0]),
            ("spawn_point.y", self.spawn_point[1]),
            ("spawn_point.z", self.spawn_point[2]),
            ("crouch_height", self.crouch_height),
            ("crouch_speed_multiplier", self.crouch_speed_multiplier),
            ("crouch_transition_duration", self.crouch_transition_duration),
            ("jump_height", self.jump_height),
            ("jump_height_offset", self.jump_height_offset),
            ("ground_offset", self.ground_offset),
            ("bunny_hop_multiplier", self.bunny_hop_multiplier),
            ("bunny_hop_grace_period", self.bunny_hop_grace_period),
            ("wall_jump_height", self.wall_jump_height),
            ("wall_jump_force", self.wall_jump_force),
            ("wall_jump_angle", self.wall_jump_angle),
            (
                "wall_jump_bunny_hop_multiplier",
                self.wall_jump_bunny_hop_multiplier,
            ),
            (
                "wall_jump_disable_directional_control_duration",
                self.wall_jump_disable_directional_control_duration,
            ),
            (
                "wall_jump_apply_force_duration",
                self.wall_jump_apply_force_duration,
            ),
            ("wall_jump_gravity_on_wall", self.wall_jump_gravity_on_wall),
            ("wall_detection_radius", self.wall_detection_radius),
            ("moving_epsilon", self.moving_epsilon),
        ];
        for (name, value) in all {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }

        let durations = [
            ("bunny_hop_grace_period", self.bunny_hop_grace_period),
            ("crouch_transition_duration", self.crouch_transition_duration),
            (
                "wall_jump_disable_directional_control_duration",
                self.wall_jump_disable_directional_control_duration,
            ),
            (
                "wall_jump_apply_force_duration",
                self.wall_jump_apply_force_duration,
            ),
        ];
        for (name, value) in durations {
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveDuration { name, value });
            }
        }

        if self.gravity >= 0.0 {
            return Err(ConfigError::UpwardGravity {
                name: "gravity",
                value: self.gravity,
            });
        }
        // Zero means the actor sticks to the wall while sliding.
        if self.wall_jump_gravity_on_wall > 0.0 {
            return Err(ConfigError::UpwardGravity {
                name: "wall_jump_gravity_on_wall",
                value: self.wall_jump_gravity_on_wall,
            });
        }

        let non_negatives = [
            ("ground_friction", self.ground_friction),
            ("air_friction", self.air_friction),
            ("air_control_multiplier", self.air_control_multiplier),
            ("jump_height", self.jump_height),
            ("jump_height_offset", self.jump_height_offset),
            ("ground_offset", self.ground_offset),
            ("wall_jump_height", self.wall_jump_height),
            ("wall_jump_force", self.wall_jump_force),
            ("moving_epsilon", self.moving_epsilon),
        ];
        for (name, value) in non_negatives {
            if value < 0.0 {
                return Err(ConfigError::NegativeValue { name, value });
            }
        }

        let positives = [
            ("ground_friction_multiplier", self.ground_friction_multiplier),
            ("base_speed", self.base_speed),
            ("sprint_multiplier", self.sprint_multiplier),
            ("crouch_speed_multiplier", self.crouch_speed_multiplier),
            ("bunny_hop_multiplier", self.bunny_hop_multiplier),
            (
                "wall_jump_bunny_hop_multiplier",
                self.wall_jump_bunny_hop_multiplier,
            ),
            ("standing_height", self.standing_height),
            ("crouch_height", self.crouch_height),
            ("radius", self.radius),
            ("wall_detection_radius", self.wall_detection_radius),
        ];
        for (name, value) in positives {
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveValue { name, value });
            }
        }

        if self.max_speed < self.base_speed {
            return Err(ConfigError::InvertedRange {
                low_name: "base_speed",
                low: self.base_speed,
                high_name: "max_speed",
                high: self.max_speed,
            });
        }
        if self.crouch_height > self.standing_height {
            return Err(ConfigError::InvertedRange {
                low_name: "crouch_height",
                low: self.crouch_height,
                high_name: "standing_height",
                high: self.standing_height,
            });
        }

        Ok(())
    }
}
