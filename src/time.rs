//! Frame timing for the update loop.
//!
//! [`Clock`] measures real frame deltas and decides whether a frame should
//! advance the simulation at all. Frames that took too long (a dragged
//! window, a breakpoint, a backgrounded tab) are skipped instead of
//! integrating one huge step.
//!
//! # Example
//!
//! ```ignore
//! let mut clock = Clock::new();
//!
//! // once per frame
//! clock.tick();
//! if let Some(dt) = clock.step_delta() {
//!     gpu.update(dt);
//! }
//! ```

use std::time::{Duration, Instant};

/// Deltas at or above this many seconds skip the update.
pub const DEFAULT_MAX_STEP: f32 = 0.15;

/// Frame clock with pause, fixed-step and time-scale controls.
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    paused: bool,
    pause_elapsed: Duration,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
    max_step: f32,
}

impl Clock {
    /// Create a clock starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            paused: false,
            pause_elapsed: Duration::ZERO,
            fixed_delta: None,
            time_scale: 1.0,
            max_step: DEFAULT_MAX_STEP,
        }
    }

    /// Advance to a new frame. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)`.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        self.advance_to(now);
        (self.elapsed_secs, self.delta_secs)
    }

    fn advance_to(&mut self, now: Instant) {
        if self.paused {
            self.delta_secs = 0.0;
            return;
        }

        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta) * self.time_scale;
        self.last_frame = now;

        let raw_elapsed = now.duration_since(self.start).saturating_sub(self.pause_elapsed);
        self.elapsed_secs = raw_elapsed.as_secs_f32() * self.time_scale;

        self.frame_count += 1;
    }

    /// The delta to simulate this frame, or `None` if the frame should not
    /// advance the simulation (paused, or the delta reached `max_step`).
    pub fn step_delta(&self) -> Option<f32> {
        if self.paused || self.delta_secs >= self.max_step {
            if !self.paused {
                log::warn!(
                    "Skipping update: frame delta {:.3}s exceeds {:.3}s",
                    self.delta_secs,
                    self.max_step
                );
            }
            return None;
        }
        Some(self.delta_secs)
    }

    /// Total elapsed time in seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time since last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause time progression.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume time progression after pausing.
    pub fn resume(&mut self) {
        if self.paused {
            let now = Instant::now();
            self.pause_elapsed += now.duration_since(self.last_frame);
            self.last_frame = now;
            self.paused = false;
        }
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use a fixed delta instead of measured frame time. `None` restores
    /// real timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Set time scale multiplier. Negative values clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Set the delta at which frames stop advancing the simulation.
    pub fn set_max_step(&mut self, max_step: f32) {
        self.max_step = max_step;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = Clock::new();
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
        assert_eq!(clock.step_delta(), Some(0.0));
    }

    #[test]
    fn test_tick_measures_delta() {
        let mut clock = Clock::new();
        let later = clock.last_frame + Duration::from_millis(20);
        clock.advance_to(later);

        assert!((clock.delta() - 0.02).abs() < 1e-6);
        assert!(clock.elapsed() > 0.0);
        assert_eq!(clock.frame(), 1);
        assert_eq!(clock.step_delta(), Some(clock.delta()));
    }

    #[test]
    fn test_long_frame_is_skipped() {
        let mut clock = Clock::new();
        let later = clock.last_frame + Duration::from_millis(200);
        clock.advance_to(later);
        assert_eq!(clock.step_delta(), None);

        let next = later + Duration::from_millis(16);
        clock.advance_to(next);
        assert!(clock.step_delta().is_some());
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut clock = Clock::new();
        clock.advance_to(clock.last_frame + Duration::from_millis(10));
        clock.pause();

        let elapsed_before = clock.elapsed();
        clock.advance_to(clock.last_frame + Duration::from_millis(10));

        assert_eq!(clock.elapsed(), elapsed_before);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.step_delta(), None);
    }

    #[test]
    fn test_fixed_delta_and_scale() {
        let mut clock = Clock::new();
        clock.set_fixed_delta(Some(0.01));
        clock.set_time_scale(2.0);
        clock.advance_to(clock.last_frame + Duration::from_millis(500));
        assert!((clock.delta() - 0.02).abs() < 1e-6);

        clock.set_time_scale(-1.0);
        clock.advance_to(clock.last_frame + Duration::from_millis(5));
        assert_eq!(clock.delta(), 0.0);
    }
}
