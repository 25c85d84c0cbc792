//! Emitter configuration and per-step simulation parameters.
//!
//! An [`EmitterOptions`] describes one fountain: how many particles it owns,
//! where they are born, which way they fly and how long they live. Each tick
//! it is turned into an immutable [`SimParams`] for the update pass.
//!
//! # Emission Cone
//!
//! Newborn particles travel in the horizontal (XZ) plane. The angle is
//! measured from +X towards +Z:
//!
//! | Angle | Direction |
//! |-------|-----------|
//! | `0` | `+X` |
//! | `π/2` | `+Z` |
//! | `±π` | `-X` |
//!
//! `min_theta..max_theta` of `-π..π` emits in a full ring.
//!
//! # Config Files
//!
//! Options load from JSON; every field is optional and falls back to the
//! default:
//!
//! ```json
//! {
//!     "num_particles": 2000,
//!     "gravity": [0.0, -0.5, 0.0],
//!     "min_speed": 0.2,
//!     "max_speed": 0.6
//! }
//! ```

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration of one particle emitter.
///
/// Bounds are interpolated as given; inverted bounds (`max < min`) are not
/// rejected and simply interpolate over a negative range.
///
/// # Example
///
/// ```ignore
/// let options = EmitterOptions::default()
///     .with_particle_count(5_000)
///     .with_gravity(Vec3::new(0.0, -0.4, 0.0))
///     .with_speed(0.3, 0.8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterOptions {
    /// Number of particles in the pool.
    pub num_particles: u32,
    /// Constant acceleration applied every step.
    pub gravity: Vec3,
    /// Spawn point for every respawned particle.
    pub origin: Vec3,
    /// Lower bound of the initial lifetime draw, in seconds.
    pub min_life: f32,
    /// Upper bound of the initial lifetime draw, in seconds.
    pub max_life: f32,
    /// Lower emission angle in radians.
    pub min_theta: f32,
    /// Upper emission angle in radians.
    pub max_theta: f32,
    /// Lower bound of the emission speed.
    pub min_speed: f32,
    /// Upper bound of the emission speed.
    pub max_speed: f32,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            num_particles: 800,
            gravity: Vec3::ZERO,
            origin: Vec3::ZERO,
            min_life: 0.3,
            max_life: 0.9,
            min_theta: -std::f32::consts::PI,
            max_theta: std::f32::consts::PI,
            min_speed: 0.5,
            max_speed: 1.0,
        }
    }
}

impl EmitterOptions {
    /// Parse options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let options = Self::from_json(&text)?;
        log::debug!("Loaded emitter options from {}", path.display());
        Ok(options)
    }

    /// Check that the pool can be driven by a random table with
    /// `noise_capacity` entries.
    pub fn validate(&self, noise_capacity: u32) -> Result<(), ConfigError> {
        if self.num_particles == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if self.num_particles > noise_capacity {
            return Err(ConfigError::CapacityExceeded {
                requested: self.num_particles,
                available: noise_capacity,
            });
        }
        Ok(())
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.num_particles = count;
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the spawn origin.
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    /// Set the initial lifetime range in seconds.
    pub fn with_life(mut self, min: f32, max: f32) -> Self {
        self.min_life = min;
        self.max_life = max;
        self
    }

    /// Set the emission angle range in radians.
    pub fn with_theta(mut self, min: f32, max: f32) -> Self {
        self.min_theta = min;
        self.max_theta = max;
        self
    }

    /// Set the emission speed range.
    pub fn with_speed(mut self, min: f32, max: f32) -> Self {
        self.min_speed = min;
        self.max_speed = max;
        self
    }

    /// Freeze the options into parameters for one update pass.
    pub fn step_params(&self, delta_time: f32) -> SimParams {
        SimParams {
            delta_time,
            gravity: self.gravity,
            origin: self.origin,
            min_theta: self.min_theta,
            max_theta: self.max_theta,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
        }
    }
}

/// Global, read-only parameters for one update pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    /// Step length in seconds.
    pub delta_time: f32,
    /// Constant acceleration.
    pub gravity: Vec3,
    /// Respawn position.
    pub origin: Vec3,
    /// Lower emission angle in radians.
    pub min_theta: f32,
    /// Upper emission angle in radians.
    pub max_theta: f32,
    /// Lower emission speed.
    pub min_speed: f32,
    /// Upper emission speed.
    pub max_speed: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        EmitterOptions::default().step_params(0.0)
    }
}

impl SimParams {
    /// Pack into the uniform block read by the update shader.
    pub fn to_uniforms(&self, num_particles: u32) -> SimUniforms {
        SimUniforms {
            gravity: self.gravity.to_array(),
            delta_time: self.delta_time,
            origin: self.origin.to_array(),
            min_theta: self.min_theta,
            max_theta: self.max_theta,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            num_particles,
        }
    }
}

/// Uniform block for the update shader.
///
/// Mirrors the WGSL `SimParams` struct; scalars fill the tail slot of each
/// `vec3`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct SimUniforms {
    pub gravity: [f32; 3],
    pub delta_time: f32,
    pub origin: [f32; 3],
    pub min_theta: f32,
    pub max_theta: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub num_particles: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EmitterOptions::default();
        assert_eq!(options.num_particles, 800);
        assert_eq!(options.min_life, 0.3);
        assert_eq!(options.max_life, 0.9);
        assert_eq!(options.min_theta, -std::f32::consts::PI);
        assert_eq!(options.max_theta, std::f32::consts::PI);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = EmitterOptions::from_json(
            r#"{ "num_particles": 16, "gravity": [0.0, -9.8, 0.0] }"#,
        )
        .unwrap();
        assert_eq!(options.num_particles, 16);
        assert_eq!(options.gravity, Vec3::new(0.0, -9.8, 0.0));
        assert_eq!(options.max_speed, 1.0);
    }

    #[test]
    fn test_invalid_json() {
        let err = EmitterOptions::from_json("{ num_particles: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EmitterOptions::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_validate() {
        let options = EmitterOptions::default();
        assert!(options.validate(800).is_ok());
        assert!(matches!(
            options.validate(799),
            Err(ConfigError::CapacityExceeded { requested: 800, available: 799 })
        ));
        assert!(matches!(
            options.with_particle_count(0).validate(10),
            Err(ConfigError::EmptyPool)
        ));
    }

    #[test]
    fn test_inverted_bounds_are_accepted() {
        let options = EmitterOptions::default().with_speed(2.0, 1.0).with_theta(1.0, -1.0);
        assert!(options.validate(1024).is_ok());
    }

    #[test]
    fn test_step_params_carry_options() {
        let options = EmitterOptions::default()
            .with_origin(Vec3::new(1.0, 2.0, 3.0))
            .with_speed(0.1, 0.2);
        let params = options.step_params(0.016);
        assert_eq!(params.delta_time, 0.016);
        assert_eq!(params.origin, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(params.min_speed, 0.1);
        assert_eq!(params.max_speed, 0.2);
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<SimUniforms>(), 48);
        let uniforms = EmitterOptions::default().step_params(0.5).to_uniforms(42);
        assert_eq!(uniforms.delta_time, 0.5);
        assert_eq!(uniforms.num_particles, 42);
    }
}
