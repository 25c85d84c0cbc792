//! # Sparkfall
//!
//! A GPU particle fountain: a fixed pool of particles is emitted from a
//! single point, ages, falls under gravity and is re-emitted when it
//! expires. Each frame has two stages:
//!
//! 1. **Update**: every particle in the previous buffer is advanced into the
//!    next buffer. Expired particles are re-emitted from the origin with a
//!    direction and speed drawn from a static random table; live ones are
//!    integrated one explicit Euler step.
//! 2. **Render**: the buffer the update just finished is drawn as points
//!    whose color, opacity and size depend on normalized age.
//!
//! Sparkfall handles the GPU plumbing (ping-pong buffers, compute and render
//! pipelines, the noise and gradient textures). The same update rule is also
//! available on the CPU through [`ParticleStore`], which is what the tests
//! and the headless mode use.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sparkfall::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Simulation::new()
//!         .with_emitter(
//!             EmitterOptions::default()
//!                 .with_particle_count(2_000)
//!                 .with_gravity(Vec3::new(0.0, -0.8, 0.0)),
//!         )
//!         .with_gradient(Gradient::fireball())
//!         .run()
//! }
//! ```
//!
//! ## Stepping on the CPU
//!
//! ```ignore
//! use sparkfall::prelude::*;
//!
//! let options = EmitterOptions::default();
//! let noise = NoiseTable::with_seed(7);
//! let mut store = ParticleStore::with_seed(&options, 7);
//!
//! let params = options.step_params(1.0 / 60.0);
//! let stats = store.step(&params, &noise);
//! println!("{} respawned, {} integrated", stats.respawned, stats.integrated);
//! ```
//!
//! ## Controls
//!
//! | Input | Action |
//! |-------|--------|
//! | Left drag | Rotate the camera (stops auto-orbit) |
//! | Scroll | Zoom |
//! | Space | Pause / resume |
//! | O | Reset the orbiting camera |
//! | Escape | Quit |

pub mod emitter;
pub mod error;
mod gpu;
pub mod gradient;
pub mod particle;
pub mod random;
pub mod render;
pub mod shader;
mod simulation;
pub mod store;
pub mod time;
pub mod update;

pub use bytemuck;
pub use emitter::{EmitterOptions, SimParams, SimUniforms};
pub use error::{ConfigError, GpuError, SimulationError, TextureError};
pub use glam::{Mat4, Vec2, Vec3, Vec4};
pub use gpu::Camera;
pub use gradient::Gradient;
pub use particle::Particle;
pub use random::{NoiseTable, RandomSource};
pub use render::{project, project_all, shade, ColorMode, RenderConfig, ScreenPoint, Shade, SizeMode};
pub use simulation::Simulation;
pub use store::{ParticleStore, StepStats};
pub use time::Clock;
pub use update::{advance, Transition};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use sparkfall::prelude::*;
/// ```
pub mod prelude {
    pub use crate::emitter::EmitterOptions;
    pub use crate::error::SimulationError;
    pub use crate::gpu::Camera;
    pub use crate::gradient::Gradient;
    pub use crate::particle::Particle;
    pub use crate::random::{NoiseTable, RandomSource};
    pub use crate::render::{ColorMode, RenderConfig, SizeMode};
    pub use crate::simulation::Simulation;
    pub use crate::store::{ParticleStore, StepStats};
    pub use crate::time::Clock;
    pub use crate::{Mat4, Vec2, Vec3, Vec4};
}
