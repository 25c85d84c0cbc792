//! Double-buffered particle storage and the parallel update pass.
//!
//! The store keeps two full copies of the pool. A pass reads every record
//! from one buffer and writes every result into the other, then flips which
//! buffer is current. Readers only ever see a completed buffer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::emitter::{EmitterOptions, SimParams};
use crate::particle::Particle;
use crate::random::RandomSource;
use crate::update::advance;

/// Counts from one update pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Particles re-emitted from the origin.
    pub respawned: usize,
    /// Particles integrated in place.
    pub integrated: usize,
}

impl StepStats {
    /// Sum of two passes' counts.
    pub fn merge(self, other: StepStats) -> StepStats {
        StepStats {
            respawned: self.respawned + other.respawned,
            integrated: self.integrated + other.integrated,
        }
    }

    /// Total particles processed.
    pub fn total(&self) -> usize {
        self.respawned + self.integrated
    }
}

/// Fixed-capacity, double-buffered particle pool.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    buffers: [Vec<Particle>; 2],
    generation: u64,
}

impl ParticleStore {
    /// Create a store filled with initial particles from a random seed.
    pub fn new(options: &EmitterOptions) -> Self {
        Self::from_particles(initial_particles(options, &mut rand::thread_rng()))
    }

    /// Create a store whose initial lifetimes come from `seed`.
    pub fn with_seed(options: &EmitterOptions, seed: u64) -> Self {
        Self::from_particles(initial_particles(options, &mut StdRng::seed_from_u64(seed)))
    }

    /// Create a store holding exactly `particles`. Both buffers start equal.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        log::debug!("Particle store created with {} particles", particles.len());
        Self {
            buffers: [particles.clone(), particles],
            generation: 0,
        }
    }

    /// Number of particles in the pool.
    pub fn capacity(&self) -> usize {
        self.buffers[0].len()
    }

    /// Number of completed update passes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The most recently completed buffer.
    pub fn current(&self) -> &[Particle] {
        &self.buffers[self.read_index()]
    }

    /// The current buffer as raw bytes, for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.current())
    }

    fn read_index(&self) -> usize {
        (self.generation % 2) as usize
    }

    /// Run one update pass over every particle, then swap buffers.
    ///
    /// Each particle is advanced independently on the rayon pool. `random`
    /// must cover every index below [`capacity`](Self::capacity).
    pub fn step(&mut self, params: &SimParams, random: &dyn RandomSource) -> StepStats {
        let read = self.read_index();
        let (front, back) = self.buffers.split_at_mut(1);
        let (src, dst) = if read == 0 {
            (&front[0], &mut back[0])
        } else {
            (&back[0], &mut front[0])
        };

        let stats = src
            .par_iter()
            .zip(dst.par_iter_mut())
            .enumerate()
            .map(|(index, (prev, next))| {
                let transition = advance(prev, params, random.sample(index as u32));
                *next = transition.particle();
                if transition.is_respawn() {
                    StepStats { respawned: 1, integrated: 0 }
                } else {
                    StepStats { respawned: 0, integrated: 1 }
                }
            })
            .reduce(StepStats::default, StepStats::merge);

        self.generation += 1;
        log::trace!(
            "Update pass {}: {} respawned, {} integrated",
            self.generation,
            stats.respawned,
            stats.integrated
        );
        stats
    }
}

/// Build the initial pool for `options`.
///
/// Every particle starts at the world origin at rest with a lifetime drawn
/// from `[min_life, max_life)`. Its age is set past that lifetime so the
/// first update pass emits it.
pub fn initial_particles<R: Rng + ?Sized>(options: &EmitterOptions, rng: &mut R) -> Vec<Particle> {
    (0..options.num_particles)
        .map(|_| {
            let life = options.min_life + rng.gen::<f32>() * (options.max_life - options.min_life);
            Particle {
                position: glam::Vec3::ZERO,
                age: life + 1.0,
                velocity: glam::Vec3::ZERO,
                life,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::NoiseTable;
    use glam::{Vec2, Vec3};

    fn fixed(_: u32) -> Vec2 {
        Vec2::new(0.5, 0.5)
    }

    #[test]
    fn test_initial_particles_expire_immediately() {
        let options = EmitterOptions::default().with_particle_count(100);
        let particles = initial_particles(&options, &mut StdRng::seed_from_u64(1));
        assert_eq!(particles.len(), 100);
        for p in &particles {
            assert!(p.life >= options.min_life && p.life < options.max_life);
            assert!(p.is_expired());
            assert_eq!(p.velocity, Vec3::ZERO);
        }
    }

    #[test]
    fn test_first_step_respawns_everything() {
        let options = EmitterOptions::default().with_particle_count(64);
        let mut store = ParticleStore::with_seed(&options, 3);
        let stats = store.step(&options.step_params(0.016), &NoiseTable::new(8, 8, 0));

        assert_eq!(stats, StepStats { respawned: 64, integrated: 0 });
        assert_eq!(store.generation(), 1);
        for p in store.current() {
            assert_eq!(p.age, 0.0);
            assert_eq!(p.position, options.origin);
        }
    }

    #[test]
    fn test_step_swaps_buffers() {
        let particles = vec![Particle::new(Vec3::ZERO, 0.0, 10.0, Vec3::X); 4];
        let mut store = ParticleStore::from_particles(particles);
        let params = SimParams {
            delta_time: 1.0,
            ..SimParams::default()
        };

        store.step(&params, &fixed);
        assert_eq!(store.current()[0].position, Vec3::X);
        store.step(&params, &fixed);
        assert_eq!(store.current()[0].position, Vec3::new(2.0, 0.0, 0.0));
        store.step(&params, &fixed);
        assert_eq!(store.current()[0].position, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(store.generation(), 3);
    }

    #[test]
    fn test_matches_sequential_advance() {
        let options = EmitterOptions::default()
            .with_particle_count(500)
            .with_gravity(Vec3::new(0.0, -1.0, 0.0));
        let noise = NoiseTable::new(32, 32, 11);
        let params = options.step_params(0.05);
        let mut store = ParticleStore::with_seed(&options, 5);

        for _ in 0..40 {
            let expected: Vec<Particle> = store
                .current()
                .iter()
                .enumerate()
                .map(|(i, p)| advance(p, &params, noise.sample(i as u32)).particle())
                .collect();
            store.step(&params, &noise);
            assert_eq!(store.current(), expected.as_slice());
        }
    }

    #[test]
    fn test_particle_independent_of_neighbors() {
        let params = SimParams {
            delta_time: 0.1,
            gravity: Vec3::new(0.0, -9.8, 0.0),
            ..SimParams::default()
        };
        let target = Particle::new(Vec3::ONE, 0.2, 1.0, Vec3::new(0.3, 0.0, 0.0));

        let mut alone = ParticleStore::from_particles(vec![target]);
        alone.step(&params, &fixed);

        let neighbors = vec![
            Particle::new(Vec3::splat(-4.0), 9.0, 1.0, Vec3::Y),
            target,
            Particle::new(Vec3::splat(7.0), 0.0, 0.0, Vec3::Z),
        ];
        let mut crowded = ParticleStore::from_particles(neighbors);
        let shifted = |i: u32| if i == 1 { fixed(0) } else { Vec2::new(0.9, 0.1) };
        crowded.step(&params, &shifted);

        assert_eq!(alone.current()[0], crowded.current()[1]);
    }

    #[test]
    fn test_stats_total() {
        let particles = vec![
            Particle::new(Vec3::ZERO, 2.0, 1.0, Vec3::ZERO),
            Particle::new(Vec3::ZERO, 0.0, 1.0, Vec3::ZERO),
            Particle::new(Vec3::ZERO, 0.5, 1.0, Vec3::ZERO),
        ];
        let mut store = ParticleStore::from_particles(particles);
        let stats = store.step(&SimParams::default(), &fixed);
        assert_eq!(stats.respawned, 1);
        assert_eq!(stats.integrated, 2);
        assert_eq!(stats.total(), store.capacity());
    }

    #[test]
    fn test_as_bytes_tracks_current_buffer() {
        let mut store =
            ParticleStore::from_particles(vec![Particle::new(Vec3::ZERO, 0.0, 1.0, Vec3::X)]);
        let params = SimParams {
            delta_time: 0.5,
            ..SimParams::default()
        };
        store.step(&params, &fixed);
        let back: &[Particle] = bytemuck::cast_slice(store.as_bytes());
        assert_eq!(back, store.current());
    }
}
