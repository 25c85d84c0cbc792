//! Orbit camera around the emitter.

use std::f32::consts::TAU;

use glam::{Mat4, Vec3};

/// Vertical field of view of the perspective projection.
const FOV_Y_DEGREES: f32 = 45.0;

/// Near plane of the infinite perspective projection.
const Z_NEAR: f32 = 0.01;

/// Orbit camera for viewing the fountain.
///
/// With `orbit_period` set, [`follow_orbit`](Camera::follow_orbit) spins the
/// camera around the target at a steady rate; dragging clears it.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Seconds per full turn when orbiting automatically.
    pub orbit_period: Option<f32>,
}

impl Camera {
    /// A camera 1.5 units out and 0.5 up, circling once every five seconds.
    pub fn new() -> Self {
        let (radius, height) = (1.5_f32, 0.5_f32);
        Self {
            yaw: 0.0,
            pitch: height.atan2(radius),
            distance: radius.hypot(height),
            target: Vec3::ZERO,
            orbit_period: Some(5.0),
        }
    }

    /// Set yaw from elapsed time if auto-orbit is on.
    pub fn follow_orbit(&mut self, elapsed: f32) {
        if let Some(period) = self.orbit_period {
            self.yaw = elapsed * TAU / period;
        }
    }

    /// Apply a mouse drag in pixels. Stops auto-orbit.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.orbit_period = None;
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-1.5, 1.5);
    }

    /// Apply a scroll amount.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance - scroll * 0.3).clamp(0.5, 20.0);
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Perspective projection for a surface aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_infinite_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_starting_position() {
        let camera = Camera::new();
        assert!(approx(camera.position(), Vec3::new(0.0, 0.5, 1.5)));
    }

    #[test]
    fn test_orbit_keeps_radius_and_height() {
        let mut camera = Camera::new();
        camera.follow_orbit(1.25); // quarter turn
        let pos = camera.position();
        assert!(approx(pos, Vec3::new(1.5, 0.5, 0.0)), "{pos:?}");
    }

    #[test]
    fn test_drag_stops_orbit() {
        let mut camera = Camera::new();
        camera.drag(10.0, 0.0);
        let yaw = camera.yaw;
        camera.follow_orbit(3.0);
        assert_eq!(camera.yaw, yaw);
        assert!(camera.orbit_period.is_none());
    }

    #[test]
    fn test_zoom_clamps() {
        let mut camera = Camera::new();
        camera.zoom(1000.0);
        assert_eq!(camera.distance, 0.5);
        camera.zoom(-1000.0);
        assert_eq!(camera.distance, 20.0);
    }
}
