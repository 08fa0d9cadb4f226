//! Provides orbit-style camera controls.
//!
//! The camera sits on a sphere around a target point. Rotating moves it along
//! the sphere (azimuth around +Y, polar angle from +Y), dollying changes the
//! sphere's radius, and panning slides camera and target together.
//!
//! # Examples
//! ```
//! use glam::Vec3;
//! use shapecast::viewer::orbit::OrbitControls;
//!
//! let mut controls = OrbitControls::new(Vec3::new(2.0, 2.0, 2.0), Vec3::ZERO);
//! controls.dolly(0.5);
//! assert!((controls.distance() - 3.0_f32.sqrt()).abs() < 1e-4);
//! ```

use std::f32::consts::PI;

use glam::Vec3;

use crate::renderer::Camera;

const POLAR_EPSILON: f32 = 1e-4;

/// Orbit camera state around a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    /// Angle around +Y, measured from +Z toward +X.
    azimuth: f32,
    /// Angle from +Y.
    polar: f32,
    min_distance: f32,
    max_distance: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Camera::default().eye, Camera::default().target)
    }
}

impl OrbitControls {
    /// Places the camera at `position`, orbiting `target`.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length();
        let (azimuth, polar) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI / 2.0)
        };

        let mut controls = Self {
            target,
            radius,
            azimuth,
            polar,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        };
        controls.clamp();
        controls
    }

    /// Limits how close and how far the camera may be from the target.
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.max(0.0);
        self.max_distance = max.max(self.min_distance);
        self.clamp();
        self
    }

    /// Returns the point the camera orbits.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Returns the camera distance from the target.
    pub fn distance(&self) -> f32 {
        self.radius
    }

    /// Returns the horizontal angle in radians, measured from +Z toward +X.
    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Returns the angle from +Y in radians.
    pub fn polar(&self) -> f32 {
        self.polar
    }

    /// Returns the camera position.
    pub fn eye(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        self.target
            + Vec3::new(
                self.radius * sin_polar * self.azimuth.sin(),
                self.radius * self.polar.cos(),
                self.radius * sin_polar * self.azimuth.cos(),
            )
    }

    /// Rotates around the target. Positive `up` raises the camera.
    pub fn rotate(&mut self, left: f32, up: f32) {
        self.azimuth = (self.azimuth + left).rem_euclid(2.0 * PI);
        self.polar -= up;
        self.clamp();
    }

    /// Scales the distance to the target; `scale < 1` zooms in.
    pub fn dolly(&mut self, scale: f32) {
        if scale > 0.0 && scale.is_finite() {
            self.radius *= scale;
            self.clamp();
        }
    }

    /// Slides camera and target in the view plane, in units of the distance.
    pub fn pan(&mut self, right: f32, up: f32) {
        let forward = (self.target - self.eye()).normalize_or_zero();
        let right_axis = forward.cross(Vec3::Y).normalize_or_zero();
        let up_axis = right_axis.cross(forward);
        self.target += (right_axis * right + up_axis * up) * self.radius;
    }

    /// Applies the controls to a camera, keeping its lens settings.
    pub fn apply(&self, camera: &Camera) -> Camera {
        Camera {
            eye: self.eye(),
            target: self.target,
            ..*camera
        }
    }

    fn clamp(&mut self) {
        self.polar = self.polar.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);
    }
}
