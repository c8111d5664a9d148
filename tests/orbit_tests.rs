// Host-side tests for the orbit camera.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod core {
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod orbit {
        include!("../src/core/orbit.rs");
    }
}

use crate::core::constants::*;
use crate::core::orbit::OrbitCamera;
use glam::{Vec3, Vec4};

fn default_camera() -> OrbitCamera {
    OrbitCamera::new(Vec3::from(CAMERA_EYE), Vec3::ZERO, 16.0 / 9.0)
}

fn settle(cam: &mut OrbitCamera) {
    for _ in 0..2000 {
        if !cam.update() {
            break;
        }
    }
}

#[test]
fn starts_at_configured_eye() {
    let cam = default_camera();
    assert!((cam.eye() - Vec3::new(0.0, 2.0, 6.0)).length() < 1e-4);
    assert!((cam.radius() - 40.0f32.sqrt()).abs() < 1e-4);
    assert_eq!(cam.fov_y_deg, 75.0);
    assert_eq!(cam.near, 0.1);
    assert_eq!(cam.far, 100.0);
}

#[test]
fn update_without_input_is_still() {
    let mut cam = default_camera();
    assert!(!cam.update());
}

#[test]
fn rotation_is_damped_then_converges() {
    let mut cam = default_camera();
    let (theta0, _) = cam.angles();
    cam.rotate(-100.0, 0.0, 1000.0);
    assert!(cam.update());
    let (theta1, _) = cam.angles();
    let full = 2.0 * std::f32::consts::PI * 100.0 / 1000.0;
    // First frame applies only the damping share.
    assert!(((theta1 - theta0) - full * ORBIT_DAMPING).abs() < 1e-4);

    settle(&mut cam);
    let (theta_end, _) = cam.angles();
    assert!(((theta_end - theta0) - full).abs() < 1e-2);
    // Rotation keeps the distance to the target.
    assert!((cam.radius() - 40.0f32.sqrt()).abs() < 1e-4);
}

#[test]
fn polar_angle_stays_clear_of_poles() {
    let mut cam = default_camera();
    cam.rotate(0.0, 100_000.0, 100.0);
    settle(&mut cam);
    let (_, phi) = cam.angles();
    assert!(phi >= ORBIT_POLAR_EPS && phi <= std::f32::consts::PI - ORBIT_POLAR_EPS);
    cam.rotate(0.0, -200_000.0, 100.0);
    settle(&mut cam);
    let (_, phi) = cam.angles();
    assert!(phi >= ORBIT_POLAR_EPS);
}

#[test]
fn dolly_moves_closer_and_clamps() {
    let mut cam = default_camera();
    let r0 = cam.radius();
    cam.dolly(-120.0);
    cam.update();
    assert!((cam.radius() - r0 * ORBIT_ZOOM_STEP).abs() < 1e-4);

    for _ in 0..500 {
        cam.dolly(-1.0);
        cam.update();
    }
    assert_eq!(cam.radius(), ORBIT_MIN_RADIUS);
    for _ in 0..500 {
        cam.dolly(1.0);
        cam.update();
    }
    assert_eq!(cam.radius(), ORBIT_MAX_RADIUS);
}

#[test]
fn pan_moves_target_sideways() {
    let mut cam = default_camera();
    cam.pan(-50.0, 0.0, 800.0);
    settle(&mut cam);
    assert!(cam.target.x > 0.0);
    assert!(cam.target.y.abs() < 1e-3);
}

#[test]
fn viewport_sets_aspect_and_ignores_zero() {
    let mut cam = default_camera();
    cam.set_viewport(800, 400);
    assert_eq!(cam.aspect, 2.0);
    cam.set_viewport(0, 400);
    assert_eq!(cam.aspect, 2.0);
}

#[test]
fn target_projects_to_screen_centre() {
    let cam = default_camera();
    let clip = cam.view_proj() * Vec4::new(0.0, 0.0, 0.0, 1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
    assert!(ndc.z > 0.0 && ndc.z < 1.0);
}
