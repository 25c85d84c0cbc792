//! The particle record shared by the CPU store and the GPU buffers.
//!
//! The layout matches the WGSL struct used by the update and render shaders:
//!
//! ```wgsl
//! struct Particle {
//!     position: vec3<f32>,
//!     age: f32,
//!     velocity: vec3<f32>,
//!     life: f32,
//! };
//! ```
//!
//! `age` and `life` sit in the padding slots after each `vec3`, so a record is
//! exactly 32 bytes with no explicit padding fields.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Size of one particle record in bytes, on both sides of the bus.
pub const PARTICLE_STRIDE: usize = std::mem::size_of::<Particle>();

/// Byte offset of `age` inside a record (vertex attribute offset).
pub const AGE_OFFSET: u32 = 12;

/// Byte offset of `velocity` inside a record.
pub const VELOCITY_OFFSET: u32 = 16;

/// Byte offset of `life` inside a record (vertex attribute offset).
pub const LIFE_OFFSET: u32 = 28;

/// WGSL definition of [`Particle`], prepended to every generated shader.
pub const PARTICLE_WGSL: &str = r#"struct Particle {
    position: vec3<f32>,
    age: f32,
    velocity: vec3<f32>,
    life: f32,
};
"#;

/// One point particle.
///
/// A particle is *expired* once `age >= life`. Expired particles are replaced
/// by the update stage before they are integrated or rendered again.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Particle {
    /// Position in simulation space.
    pub position: Vec3,
    /// Seconds since the last (re)spawn.
    pub age: f32,
    /// Velocity; magnitude is speed.
    pub velocity: Vec3,
    /// Lifetime budget assigned at spawn.
    pub life: f32,
}

impl Particle {
    /// Create a particle from its four components.
    pub fn new(position: Vec3, age: f32, life: f32, velocity: Vec3) -> Self {
        Self {
            position,
            age,
            velocity,
            life,
        }
    }

    /// Whether this particle has used up its lifetime.
    ///
    /// Zero or negative lifetimes are always expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.age >= self.life
    }

    /// Normalized lifetime fraction `age / life`.
    ///
    /// Reaches exactly 1.0 on the frame a particle expires. No clamping is
    /// applied, so degenerate lifetimes pass through as-is.
    #[inline]
    pub fn normalized_age(&self) -> f32 {
        self.age / self.life
    }

    /// Current speed.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_wgsl() {
        assert_eq!(PARTICLE_STRIDE, 32);
        assert_eq!(std::mem::offset_of!(Particle, age), AGE_OFFSET as usize);
        assert_eq!(std::mem::offset_of!(Particle, velocity), VELOCITY_OFFSET as usize);
        assert_eq!(std::mem::offset_of!(Particle, life), LIFE_OFFSET as usize);
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let mut p = Particle::new(Vec3::ZERO, 1.0, 2.0, Vec3::ZERO);
        assert!(!p.is_expired());
        p.age = 2.0;
        assert!(p.is_expired());
    }

    #[test]
    fn test_non_positive_life_is_expired() {
        assert!(Particle::new(Vec3::ZERO, 0.0, 0.0, Vec3::ZERO).is_expired());
        assert!(Particle::new(Vec3::ZERO, 0.0, -1.0, Vec3::ZERO).is_expired());
    }

    #[test]
    fn test_cast_to_bytes() {
        let particles = [Particle::new(Vec3::new(1.0, 2.0, 3.0), 0.5, 1.0, Vec3::X); 4];
        let bytes: &[u8] = bytemuck::cast_slice(&particles);
        assert_eq!(bytes.len(), 4 * PARTICLE_STRIDE);

        let back: &[Particle] = bytemuck::cast_slice(bytes);
        assert_eq!(back[3], particles[3]);
    }
}
