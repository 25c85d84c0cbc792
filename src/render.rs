//! Color, opacity and size derivation for rendering.
//!
//! Everything here is a pure function of a particle's normalized age
//! `t = age / life`:
//!
//! | Output | Value |
//! |--------|-------|
//! | opacity | `1 - t` |
//! | point size | `1 + 6 * (1 - t)` ([`SizeMode::Shrink`]) or `1` ([`SizeMode::Constant`]) |
//! | color | cosine palette or gradient lookup, see [`ColorMode`] |
//!
//! The render shaders evaluate the same formulas per vertex; these functions
//! are the CPU reference for them.

use std::f32::consts::TAU;

use glam::{Mat4, Vec3, Vec4};
use rayon::prelude::*;

use crate::gradient::Gradient;
use crate::particle::Particle;

/// Cosine palette offset.
pub const PALETTE_A: Vec3 = Vec3::new(0.5, 0.5, 0.5);
/// Cosine palette amplitude.
pub const PALETTE_B: Vec3 = Vec3::new(0.5, 0.5, 0.5);
/// Cosine palette frequency.
pub const PALETTE_C: Vec3 = Vec3::new(1.0, 0.7, 0.4);
/// Cosine palette phase.
pub const PALETTE_D: Vec3 = Vec3::new(0.0, 0.15, 0.20);

/// Point size of a newborn particle in [`SizeMode::Shrink`].
pub const MAX_POINT_SIZE: f32 = 7.0;

/// How particle color is derived from normalized age.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ColorMode {
    /// Closed-form cosine ramp, no texture needed.
    #[default]
    Palette,
    /// Lookup into a color ramp at coordinate `(t, 0.5)`.
    Gradient(Gradient),
}

/// How point size is derived from normalized age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// Shrink linearly from 7 to 1 over the lifetime.
    #[default]
    Shrink,
    /// Always 1.
    Constant,
}

/// Render-time configuration chosen when the renderer is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderConfig {
    pub color: ColorMode,
    pub size: SizeMode,
}

impl RenderConfig {
    /// Configuration with the given color mode and shrinking points.
    pub fn new(color: ColorMode) -> Self {
        Self {
            color,
            size: SizeMode::Shrink,
        }
    }

    /// Set the size mode.
    pub fn with_size(mut self, size: SizeMode) -> Self {
        self.size = size;
        self
    }
}

/// Visual attributes of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shade {
    pub color: Vec3,
    pub opacity: f32,
    pub point_size: f32,
}

/// A particle ready for rasterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// `projection * view * position`, before the perspective divide.
    pub clip_position: Vec4,
    pub shade: Shade,
}

/// Cosine palette `a + b * cos(2π (c t + d))`, componentwise.
pub fn palette_color(t: f32) -> Vec3 {
    let phase = (PALETTE_C * t + PALETTE_D) * TAU;
    PALETTE_A + PALETTE_B * Vec3::new(phase.x.cos(), phase.y.cos(), phase.z.cos())
}

/// Opacity at normalized age `t`.
#[inline]
pub fn opacity(t: f32) -> f32 {
    1.0 - t
}

/// Point size at normalized age `t`.
#[inline]
pub fn point_size(t: f32, mode: SizeMode) -> f32 {
    match mode {
        SizeMode::Shrink => 1.0 + (MAX_POINT_SIZE - 1.0) * (1.0 - t),
        SizeMode::Constant => 1.0,
    }
}

/// Derive color, opacity and size for one particle.
///
/// `t` reaches 1 exactly on the frame a particle expires; that frame renders
/// fully transparent at size 1.
pub fn shade(particle: &Particle, config: &RenderConfig) -> Shade {
    let t = particle.normalized_age();
    let color = match &config.color {
        ColorMode::Palette => palette_color(t),
        ColorMode::Gradient(ramp) => ramp.sample(t).truncate(),
    };
    Shade {
        color,
        opacity: opacity(t),
        point_size: point_size(t, config.size),
    }
}

/// Transform a particle to clip space and shade it.
pub fn project(particle: &Particle, view: Mat4, projection: Mat4, config: &RenderConfig) -> ScreenPoint {
    ScreenPoint {
        clip_position: projection * view * particle.position.extend(1.0),
        shade: shade(particle, config),
    }
}

/// Project a whole completed buffer.
pub fn project_all(
    particles: &[Particle],
    view: Mat4,
    projection: Mat4,
    config: &RenderConfig,
) -> Vec<ScreenPoint> {
    let view_proj = projection * view;
    particles
        .par_iter()
        .map(|p| ScreenPoint {
            clip_position: view_proj * p.position.extend(1.0),
            shade: shade(p, config),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn aged(age: f32, life: f32) -> Particle {
        Particle::new(Vec3::ZERO, age, life, Vec3::ZERO)
    }

    #[test]
    fn test_endpoints() {
        let config = RenderConfig::default();
        let born = shade(&aged(0.0, 2.0), &config);
        assert_eq!(born.opacity, 1.0);
        assert_eq!(born.point_size, 7.0);

        let expired = shade(&aged(2.0, 2.0), &config);
        assert_eq!(expired.opacity, 0.0);
        assert_eq!(expired.point_size, 1.0);
    }

    #[test]
    fn test_monotone_in_t() {
        let mut prev_opacity = f32::INFINITY;
        let mut prev_size = f32::INFINITY;
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let o = opacity(t);
            let s = point_size(t, SizeMode::Shrink);
            assert!(o <= prev_opacity);
            assert!(s <= prev_size);
            prev_opacity = o;
            prev_size = s;
        }
    }

    #[test]
    fn test_constant_size() {
        for t in [0.0, 0.3, 1.0] {
            assert_eq!(point_size(t, SizeMode::Constant), 1.0);
        }
    }

    #[test]
    fn test_palette_values() {
        // t = 0: d = (0, 0.15, 0.2)
        let c = palette_color(0.0);
        assert!((c.x - 1.0).abs() < EPSILON);
        assert!((c.y - (0.5 + 0.5 * (TAU * 0.15).cos())).abs() < EPSILON);
        assert!((c.z - (0.5 + 0.5 * (TAU * 0.2).cos())).abs() < EPSILON);

        // t = 0.5 puts the red channel at its trough.
        assert!(palette_color(0.5).x.abs() < EPSILON);
    }

    #[test]
    fn test_palette_stays_in_unit_range() {
        for i in 0..=50 {
            let c = palette_color(i as f32 / 50.0);
            assert!(c.min_element() >= -EPSILON && c.max_element() <= 1.0 + EPSILON);
        }
    }

    #[test]
    fn test_gradient_mode_endpoints() {
        let ramp = Gradient::fireball();
        let config = RenderConfig::new(ColorMode::Gradient(ramp.clone()));

        let born = shade(&aged(0.0, 1.5), &config);
        assert_eq!(born.color, ramp.sample(0.0).truncate());

        let expired = shade(&aged(1.5, 1.5), &config);
        assert_eq!(expired.color, ramp.sample(1.0).truncate());
    }

    #[test]
    fn test_project_applies_projection_after_view() {
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let projection = Mat4::from_scale(Vec3::new(2.0, 3.0, 1.0));
        let p = Particle::new(Vec3::new(1.0, 1.0, 0.0), 0.0, 1.0, Vec3::ZERO);

        let point = project(&p, view, projection, &RenderConfig::default());
        assert_eq!(point.clip_position, Vec4::new(2.0, 3.0, -5.0, 1.0));
    }

    #[test]
    fn test_project_all_matches_project() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.5, 1.5), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_infinite_rh(45f32.to_radians(), 4.0 / 3.0, 0.01);
        let config = RenderConfig::default();
        let particles: Vec<Particle> = (0..16)
            .map(|i| Particle::new(Vec3::splat(i as f32 * 0.1), i as f32 * 0.05, 1.0, Vec3::ZERO))
            .collect();

        let all = project_all(&particles, view, projection, &config);
        for (p, point) in particles.iter().zip(&all) {
            let single = project(p, view, projection, &config);
            assert!((single.clip_position - point.clip_position).abs().max_element() < EPSILON);
            assert_eq!(single.shade, point.shade);
        }
    }
}
