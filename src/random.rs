//! Per-particle random samples.
//!
//! The update stage draws two uniform scalars for every respawn. Where they
//! come from is injected through [`RandomSource`]; the default is a
//! [`NoiseTable`], the same RG byte table that is uploaded as the update
//! shader's noise texture, so the CPU and GPU paths see identical draws.
//!
//! Samples are keyed only by particle index, so one table yields the same
//! value for a particle on every tick until it is [reseeded](NoiseTable::reseed).

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default width and height of the noise table, in texels.
pub const NOISE_SIZE: u32 = 512;

/// A source of two-component samples in `[0, 1)²`, keyed by particle index.
///
/// Implementations must be deterministic for a given index and must not
/// depend on any other index, since the update pass calls `sample` from many
/// threads in arbitrary order.
pub trait RandomSource: Sync {
    /// Sample for the particle at `index`.
    fn sample(&self, index: u32) -> Vec2;
}

impl<F> RandomSource for F
where
    F: Fn(u32) -> Vec2 + Sync,
{
    fn sample(&self, index: u32) -> Vec2 {
        self(index)
    }
}

/// A precomputed table of random RG byte pairs.
///
/// Entry `i` lives at texel `(i % width, i / width)`. Each byte maps to
/// `byte / 255`; bytes are drawn from `0..255`, so samples stay below 1.
#[derive(Debug, Clone)]
pub struct NoiseTable {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl NoiseTable {
    /// Create a table of `width * height` entries from `seed`.
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        assert!(width > 0 && height > 0, "noise table must not be empty");
        let mut table = Self {
            width,
            height,
            data: Vec::new(),
        };
        table.reseed(seed);
        table
    }

    /// Create a `NOISE_SIZE x NOISE_SIZE` table from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(NOISE_SIZE, NOISE_SIZE, seed)
    }

    /// Regenerate every entry from a new seed.
    pub fn reseed(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let len = (self.width * self.height * 2) as usize;
        self.data = (0..len).map(|_| rng.gen_range(0..255u8)).collect();
    }

    /// Table width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Table height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of distinct particle indices the table covers.
    pub fn capacity(&self) -> u32 {
        self.width * self.height
    }

    /// Raw RG8 texel data, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Default for NoiseTable {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl RandomSource for NoiseTable {
    fn sample(&self, index: u32) -> Vec2 {
        debug_assert!(
            index < self.capacity(),
            "particle index {index} outside noise table of {} entries",
            self.capacity()
        );
        let x = index % self.width;
        let y = index / self.width;
        let offset = ((y * self.width + x) * 2) as usize;
        Vec2::new(
            self.data[offset] as f32 / 255.0,
            self.data[offset + 1] as f32 / 255.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_in_unit_range() {
        let table = NoiseTable::new(64, 64, 7);
        for i in 0..table.capacity() {
            let s = table.sample(i);
            assert!((0.0..1.0).contains(&s.x), "x = {}", s.x);
            assert!((0.0..1.0).contains(&s.y), "y = {}", s.y);
        }
    }

    #[test]
    fn test_deterministic_per_seed() {
        let a = NoiseTable::new(32, 8, 99);
        let b = NoiseTable::new(32, 8, 99);
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.sample(100), b.sample(100));
    }

    #[test]
    fn test_reseed_changes_table() {
        let mut table = NoiseTable::new(32, 32, 1);
        let before = table.as_bytes().to_vec();
        table.reseed(2);
        assert_ne!(before, table.as_bytes());
    }

    #[test]
    fn test_index_maps_to_row_major_texel() {
        let table = NoiseTable::new(4, 4, 3);
        let bytes = table.as_bytes();
        // index 6 -> texel (2, 1)
        let expected = Vec2::new(bytes[12] as f32 / 255.0, bytes[13] as f32 / 255.0);
        assert_eq!(table.sample(6), expected);
    }

    #[test]
    fn test_closure_source() {
        let source = |i: u32| Vec2::new(i as f32 * 0.25, 0.5);
        assert_eq!(source.sample(3), Vec2::new(0.75, 0.5));
    }

    #[test]
    fn test_default_size() {
        let table = NoiseTable::default();
        assert_eq!(table.capacity(), NOISE_SIZE * NOISE_SIZE);
        assert_eq!(table.as_bytes().len(), (NOISE_SIZE * NOISE_SIZE * 2) as usize);
    }
}
