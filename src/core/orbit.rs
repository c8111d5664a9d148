// Perspective camera with damped orbit, pan and dolly controls.
//
// Input handlers only accumulate pending motion; `update()` is called once
// per frame and applies a fraction of it, which gives the eased feel of
// damped orbit controls.

use super::constants::{
    CAMERA_FAR, CAMERA_FOV_Y_DEG, CAMERA_NEAR, ORBIT_DAMPING, ORBIT_MAX_RADIUS, ORBIT_MIN_RADIUS,
    ORBIT_POLAR_EPS, ORBIT_ROTATE_SPEED, ORBIT_ZOOM_STEP,
};
use glam::{Mat4, Vec3};
use std::f32::consts::PI;

#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    radius: f32,
    /// Azimuth around +Y, zero on +Z.
    theta: f32,
    /// Polar angle from +Y.
    phi: f32,
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
    pending_pan: Vec3,
}

impl OrbitCamera {
    pub fn new(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        let offset = eye - target;
        let radius = offset.length().clamp(ORBIT_MIN_RADIUS, ORBIT_MAX_RADIUS);
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / offset.length().max(f32::EPSILON))
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(ORBIT_POLAR_EPS, PI - ORBIT_POLAR_EPS);
        Self {
            target,
            radius,
            theta,
            phi,
            fov_y_deg: CAMERA_FOV_Y_DEG,
            aspect,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
            pending_pan: Vec3::ZERO,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn angles(&self) -> (f32, f32) {
        (self.theta, self.phi)
    }

    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + Vec3::new(
                self.radius * sin_phi * self.theta.sin(),
                self.radius * self.phi.cos(),
                self.radius * sin_phi * self.theta.cos(),
            )
    }

    /// Keep the projection in sync with the output surface.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Drag by `(dx, dy)` pixels on a viewport `viewport_h` pixels tall.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_h: f32) {
        let h = viewport_h.max(1.0);
        self.pending_theta -= 2.0 * PI * dx / h * ORBIT_ROTATE_SPEED;
        self.pending_phi -= 2.0 * PI * dy / h * ORBIT_ROTATE_SPEED;
    }

    /// Screen-space pan: the point under the cursor follows the cursor.
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_h: f32) {
        let h = viewport_h.max(1.0);
        let world_per_px = 2.0 * self.radius * (self.fov_y_deg.to_radians() * 0.5).tan() / h;
        let view = self.view_matrix().inverse();
        let right = view.x_axis.truncate();
        let up = view.y_axis.truncate();
        self.pending_pan += -right * dx * world_per_px + up * dy * world_per_px;
    }

    /// Wheel input; negative `delta_y` moves closer.
    pub fn dolly(&mut self, delta_y: f32) {
        if delta_y < 0.0 {
            self.pending_scale *= ORBIT_ZOOM_STEP;
        } else if delta_y > 0.0 {
            self.pending_scale /= ORBIT_ZOOM_STEP;
        }
    }

    /// Apply a damped share of pending motion. Returns `true` if the camera moved.
    pub fn update(&mut self) -> bool {
        let before = (self.theta, self.phi, self.radius, self.target);

        self.theta += self.pending_theta * ORBIT_DAMPING;
        self.phi = (self.phi + self.pending_phi * ORBIT_DAMPING)
            .clamp(ORBIT_POLAR_EPS, PI - ORBIT_POLAR_EPS);
        self.radius = (self.radius * self.pending_scale).clamp(ORBIT_MIN_RADIUS, ORBIT_MAX_RADIUS);
        self.target += self.pending_pan * ORBIT_DAMPING;

        self.pending_theta *= 1.0 - ORBIT_DAMPING;
        self.pending_phi *= 1.0 - ORBIT_DAMPING;
        self.pending_pan *= 1.0 - ORBIT_DAMPING;
        self.pending_scale = 1.0;

        before != (self.theta, self.phi, self.radius, self.target)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            self.aspect.max(f32::EPSILON),
            self.near,
            self.far,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
