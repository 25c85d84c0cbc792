//! One-dimensional color ramps for gradient shading.
//!
//! A [`Gradient`] is a row of RGBA color stops. On the GPU it is uploaded as a
//! `stops x 1` texture and sampled with linear filtering and clamp-to-edge
//! addressing; [`Gradient::sample`] reproduces that lookup on the CPU, so the
//! first stop owns coordinate 0 and the last stop owns coordinate 1.
//!
//! # Example
//!
//! ```ignore
//! let ramp = Gradient::new(vec![
//!     Vec4::new(1.0, 1.0, 1.0, 1.0),
//!     Vec4::new(1.0, 0.5, 0.0, 1.0),
//!     Vec4::new(0.0, 0.0, 0.0, 0.0),
//! ])?;
//! let mid = ramp.sample(0.5);
//! ```

use std::path::Path;

use glam::Vec4;

use crate::error::TextureError;

/// Maximum number of color stops in one ramp.
pub const MAX_STOPS: usize = 256;

/// A color ramp indexed by a parametric coordinate in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<Vec4>,
}

impl Gradient {
    /// Create a ramp from evenly spaced color stops.
    pub fn new(stops: Vec<Vec4>) -> Result<Self, TextureError> {
        if stops.is_empty() {
            return Err(TextureError::EmptyGradient);
        }
        if stops.len() > MAX_STOPS {
            return Err(TextureError::TooManyStops(stops.len()));
        }
        Ok(Self { stops })
    }

    /// Two-stop ramp from `start` to `end`.
    pub fn linear(start: Vec4, end: Vec4) -> Self {
        Self {
            stops: vec![start, end],
        }
    }

    /// White-hot core cooling through gold and ember to transparent black.
    pub fn fireball() -> Self {
        Self {
            stops: vec![
                Vec4::new(1.0, 1.0, 1.0, 1.0),
                Vec4::new(1.0, 0.83, 0.0, 0.9),
                Vec4::new(0.75, 0.25, 0.05, 0.8),
                Vec4::new(0.18, 0.0, 0.02, 0.5),
                Vec4::new(0.0, 0.0, 0.0, 0.0),
            ],
        }
    }

    /// Load a ramp from the first row of an image file.
    pub fn from_image<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path.as_ref())?.into_rgba8();
        let stops = img
            .rows()
            .next()
            .map(|row| {
                row.map(|px| {
                    let [r, g, b, a] = px.0;
                    Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
                })
                .collect()
            })
            .unwrap_or_default();
        log::debug!("Loaded gradient from {}", path.as_ref().display());
        Self::new(stops)
    }

    /// The color stops, first to last.
    pub fn stops(&self) -> &[Vec4] {
        &self.stops
    }

    /// Number of stops (texture width).
    pub fn width(&self) -> u32 {
        self.stops.len() as u32
    }

    /// Stops quantized to RGBA8 for texture upload.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.stops
            .iter()
            .flat_map(|c| c.to_array())
            .map(|f| (f.clamp(0.0, 1.0) * 255.0) as u8)
            .collect()
    }

    /// Sample the ramp at `u`, filtering linearly between stops.
    ///
    /// Stop `i` sits at texel center `(i + 0.5) / n`; coordinates outside the
    /// outermost centers clamp to the edge stops.
    pub fn sample(&self, u: f32) -> Vec4 {
        let last = self.stops.len() - 1;
        let x = (u * self.stops.len() as f32 - 0.5).clamp(0.0, last as f32);
        let i0 = x.floor() as usize;
        let i1 = (i0 + 1).min(last);
        self.stops[i0].lerp(self.stops[i1], x - i0 as f32)
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::fireball()
    }
}
