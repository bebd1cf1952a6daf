//! Damped orbit camera
//!
//! Spherical coordinates around a target, Y up. Input queues rotation and
//! zoom; `update` applies a fraction of the queue each frame so the motion
//! eases out instead of stopping dead.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Minimum elevation in radians (avoids flipping over the pole).
const MIN_POLAR: f32 = 0.01;
/// Maximum elevation in radians.
const MAX_POLAR: f32 = std::f32::consts::PI - 0.01;
/// Minimum zoom distance.
const MIN_DISTANCE: f32 = 0.5;
/// Queued motion below this is dropped.
const REST_EPSILON: f32 = 1e-5;

/// Camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Share of the queued motion applied per 60 Hz frame
    pub damping_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [-3.0, 3.0, 3.0],
            target: [0.0, 0.0, 0.0],
            fov: 75.0,
            near: 0.1,
            far: 100.0,
            damping_factor: 0.05,
        }
    }
}

/// Orbit controls with damping
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Distance from target
    pub radius: f32,
    /// Angle from +Y in radians
    pub polar: f32,
    /// Angle around Y in radians, measured from +Z
    pub azimuth: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    damping_factor: f32,

    // Motion still to apply
    pending_azimuth: f32,
    pending_polar: f32,
    pending_zoom: f32,
}

impl OrbitCamera {
    /// Create a camera from its config
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let target = Vec3::from_array(config.target);
        let offset = Vec3::from_array(config.position) - target;
        let radius = offset.length().max(MIN_DISTANCE);
        Self {
            target,
            radius,
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos().clamp(MIN_POLAR, MAX_POLAR),
            azimuth: offset.x.atan2(offset.z),
            fov: config.fov,
            near: config.near,
            far: config.far,
            aspect,
            damping_factor: config.damping_factor.clamp(0.0, 1.0),
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_zoom: 0.0,
        }
    }

    /// Eye position
    pub fn eye(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_polar * self.azimuth.sin(),
                    self.polar.cos(),
                    sin_polar * self.azimuth.cos(),
                )
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    /// Perspective projection
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Queue a horizontal orbit in radians
    pub fn rotate_left(&mut self, angle: f32) {
        self.pending_azimuth -= angle;
    }

    /// Queue a vertical orbit in radians
    pub fn rotate_up(&mut self, angle: f32) {
        self.pending_polar -= angle;
    }

    /// Queue a zoom; positive moves closer
    pub fn dolly(&mut self, amount: f32) {
        self.pending_zoom -= amount;
    }

    /// Whether queued motion remains
    pub fn is_moving(&self) -> bool {
        self.pending_azimuth.abs() > REST_EPSILON
            || self.pending_polar.abs() > REST_EPSILON
            || self.pending_zoom.abs() > REST_EPSILON
    }

    /// Apply part of the queued motion for a frame of `delta` seconds
    pub fn update(&mut self, delta: f32) {
        if !self.is_moving() {
            self.pending_azimuth = 0.0;
            self.pending_polar = 0.0;
            self.pending_zoom = 0.0;
            return;
        }

        // Same easing at any frame rate as damping_factor gives at 60 Hz
        let share = 1.0 - (1.0 - self.damping_factor).powf(delta.max(0.0) * 60.0);

        let d_azimuth = self.pending_azimuth * share;
        let d_polar = self.pending_polar * share;
        let d_zoom = self.pending_zoom * share;

        self.azimuth += d_azimuth;
        self.polar = (self.polar + d_polar).clamp(MIN_POLAR, MAX_POLAR);
        self.radius = (self.radius + d_zoom).max(MIN_DISTANCE);

        self.pending_azimuth -= d_azimuth;
        self.pending_polar -= d_polar;
        self.pending_zoom -= d_zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_starts_at_configured_position() {
        let camera = OrbitCamera::new(&CameraConfig::default(), 16.0 / 9.0);
        let eye = camera.eye();
        assert_relative_eq!(eye.x, -3.0, epsilon = 1e-4);
        assert_relative_eq!(eye.y, 3.0, epsilon = 1e-4);
        assert_relative_eq!(eye.z, 3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_motion_eases_out() {
        let mut camera = OrbitCamera::new(&CameraConfig::default(), 1.0);
        let start = camera.azimuth;
        camera.rotate_left(-1.0);

        camera.update(1.0 / 60.0);
        let first = camera.azimuth - start;
        assert_relative_eq!(first, 0.05, epsilon = 1e-4);

        camera.update(1.0 / 60.0);
        let second = camera.azimuth - start - first;
        assert!(second < first);

        for _ in 0..600 {
            camera.update(1.0 / 60.0);
        }
        assert!(!camera.is_moving());
        assert_relative_eq!(camera.azimuth - start, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_zero_delta_does_not_move() {
        let mut camera = OrbitCamera::new(&CameraConfig::default(), 1.0);
        camera.dolly(1.0);
        let radius = camera.radius;
        camera.update(0.0);
        assert_eq!(camera.radius, radius);
    }

    #[test]
    fn test_polar_is_clamped() {
        let mut camera = OrbitCamera::new(&CameraConfig::default(), 1.0);
        camera.rotate_up(10.0);
        for _ in 0..600 {
            camera.update(1.0 / 60.0);
        }
        assert!(camera.polar >= MIN_POLAR);
        assert!(camera.eye().y > 0.0);
    }
}
