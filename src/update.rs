//! The per-particle update transition.
//!
//! Every tick each particle takes exactly one of two transitions:
//!
//! | Condition | Transition |
//! |-----------|------------|
//! | `age >= life` | [`Transition::Respawned`] at the emitter origin |
//! | otherwise | [`Transition::Integrated`] by one Euler step |
//!
//! [`advance`] is a pure function of the particle's own previous record, the
//! shared [`SimParams`] and the particle's own random sample. That is the
//! whole contract the parallel update pass relies on.

use glam::{Vec2, Vec3};

use crate::emitter::SimParams;
use crate::particle::Particle;

/// Outcome of one update step for one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// The particle had expired and was re-emitted from the origin.
    Respawned(Particle),
    /// The particle was alive and moved forward in time.
    Integrated(Particle),
}

impl Transition {
    /// The next record, whichever transition produced it.
    #[inline]
    pub fn particle(&self) -> Particle {
        match *self {
            Transition::Respawned(p) | Transition::Integrated(p) => p,
        }
    }

    /// Whether this was a respawn.
    #[inline]
    pub fn is_respawn(&self) -> bool {
        matches!(self, Transition::Respawned(_))
    }
}

impl From<Transition> for Particle {
    fn from(transition: Transition) -> Self {
        transition.particle()
    }
}

/// Advance one particle by one step.
///
/// `sample` supplies `(r1, r2)` in `[0, 1)`; it is only read on respawn.
/// `r1` picks the emission angle, `r2` the speed.
///
/// Inverted parameter bounds are interpolated as-is.
#[inline]
pub fn advance(prev: &Particle, params: &SimParams, sample: Vec2) -> Transition {
    if prev.is_expired() {
        Transition::Respawned(respawn(prev, params, sample))
    } else {
        Transition::Integrated(integrate(prev, params))
    }
}

/// Re-emit an expired particle. Lifetime carries over unchanged.
fn respawn(prev: &Particle, params: &SimParams, sample: Vec2) -> Particle {
    let theta = params.min_theta + sample.x * (params.max_theta - params.min_theta);
    let speed = params.min_speed + sample.y * (params.max_speed - params.min_speed);

    Particle {
        position: params.origin,
        age: 0.0,
        velocity: emission_direction(theta) * speed,
        life: prev.life,
    }
}

/// One explicit Euler step under gravity.
///
/// Position moves with the previous velocity; velocity then picks up this
/// step's acceleration.
fn integrate(prev: &Particle, params: &SimParams) -> Particle {
    let dt = params.delta_time;
    Particle {
        position: prev.position + prev.velocity * dt,
        age: prev.age + dt,
        velocity: prev.velocity + params.gravity * dt,
        life: prev.life,
    }
}

/// Unit direction in the horizontal plane for angle `theta`, measured from
/// +X towards +Z.
#[inline]
pub fn emission_direction(theta: f32) -> Vec3 {
    let (sin, cos) = theta.sin_cos();
    Vec3::new(cos, 0.0, sin)
}
