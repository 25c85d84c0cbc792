//! Error types for Sparkfall.
//!
//! The update and render stages themselves never fail; these cover GPU
//! initialization, gradient loading, configuration files and the runner.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    #[error("Surface has no supported texture formats")]
    NoSurfaceFormat,
}

/// Errors that can occur while building a gradient ramp.
#[derive(Debug, Error)]
pub enum TextureError {
    /// Failed to decode an image file.
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),
    /// A ramp needs at least one color stop.
    #[error("Gradient has no color stops")]
    EmptyGradient,
    /// The ramp is wider than a single texture row allows.
    #[error("Gradient has {0} color stops, at most {max} are supported", max = crate::gradient::MAX_STOPS)]
    TooManyStops(usize),
}

/// Errors in emitter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration is not valid JSON for [`EmitterOptions`](crate::EmitterOptions).
    #[error("Invalid emitter config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A pool with zero particles cannot be simulated.
    #[error("Emitter must have at least one particle")]
    EmptyPool,
    /// More particles than the random table has entries.
    #[error("Emitter has {requested} particles but the noise table only covers {available}")]
    CapacityExceeded {
        /// Requested particle count.
        requested: u32,
        /// Entries in the random table.
        available: u32,
    },
}

/// Errors that can occur when running a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Failed to create or run the event loop.
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Emitter configuration rejected.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let err = ConfigError::CapacityExceeded {
            requested: 10,
            available: 4,
        };
        assert_eq!(
            err.to_string(),
            "Emitter has 10 particles but the noise table only covers 4"
        );
    }

    #[test]
    fn test_too_many_stops_message() {
        let err = TextureError::TooManyStops(300);
        assert!(err.to_string().contains("at most 256"));
    }

    #[test]
    fn test_config_wraps_into_simulation_error() {
        let err: SimulationError = ConfigError::EmptyPool.into();
        assert!(matches!(err, SimulationError::Config(ConfigError::EmptyPool)));
    }
}
