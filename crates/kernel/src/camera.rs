use std::f32::consts::TAU;

use blitz_input::{FrameSignals, InputState};
use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{CameraConfig, POLE_GUARD};

/// World up. Every basis and look matrix is built against it.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Which coordinate representation drives the eye position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    /// Eye integrated directly from movement input.
    Free,
    /// Eye derived from spherical coordinates around `look_at`.
    Orbit,
}

/// Orbit coordinates around the look-at anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalPosition {
    /// Elevation, radians.
    pub phi: f32,
    /// Azimuth, radians.
    pub theta: f32,
    pub distance: f32,
}

impl SphericalPosition {
    /// Offset of the eye from the anchor.
    pub fn to_cartesian(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(
            self.distance * cos_phi * sin_theta,
            self.distance * sin_phi,
            self.distance * cos_phi * cos_theta,
        )
    }
}

/// Player camera with interchangeable free and orbit modes.
///
/// `view_vector` is the single source of truth for "forward" and stays unit
/// length after every operation. In orbit mode the eye never coincides with
/// the anchor because the distance is floored at `min_distance`.
#[derive(Debug, Clone)]
pub struct Camera {
    cartesian_position: Vec3,
    spherical: SphericalPosition,
    look_at: Vec3,
    view_vector: Vec3,
    mode: CameraMode,
    fov: f32,
    near: f32,
    far: f32,
    input: InputState,
    config: CameraConfig,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl Camera {
    /// Create an orbit camera from validated tuning.
    pub fn new(config: CameraConfig) -> Self {
        let spherical = SphericalPosition {
            phi: clamp_elevation(config.start_elevation, &config),
            theta: wrap_azimuth(config.start_azimuth),
            distance: config.start_distance.max(config.min_distance),
        };
        let mut camera = Self {
            cartesian_position: config.start_look_at + spherical.to_cartesian(),
            spherical,
            look_at: config.start_look_at,
            view_vector: Vec3::NEG_Z,
            mode: CameraMode::Orbit,
            fov: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
            input: InputState::default(),
            config,
        };
        camera.refresh_orbit_view();
        camera
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn is_free(&self) -> bool {
        self.mode == CameraMode::Free
    }

    /// Switch modes. Entering free mode starts from the current eye so the view does not jump.
    pub fn set_mode(&mut self, mode: CameraMode) {
        if mode == self.mode {
            return;
        }
        if mode == CameraMode::Free {
            self.cartesian_position = self.eye_position();
        }
        self.mode = mode;
        self.refresh_orbit_view();
        tracing::debug!(?mode, "camera mode changed");
    }

    pub fn toggle_mode(&mut self) {
        let next = match self.mode {
            CameraMode::Free => CameraMode::Orbit,
            CameraMode::Orbit => CameraMode::Free,
        };
        self.set_mode(next);
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Move the orbit anchor, typically to track the player.
    pub fn set_look_at(&mut self, anchor: Vec3) {
        if anchor.is_finite() {
            self.look_at = anchor;
            self.refresh_orbit_view();
        }
    }

    pub fn view_vector(&self) -> Vec3 {
        self.view_vector
    }

    pub fn spherical(&self) -> SphericalPosition {
        self.spherical
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn set_input(&mut self, input: InputState) {
        self.input = input;
    }

    pub fn eye_position(&self) -> Vec3 {
        match self.mode {
            CameraMode::Free => self.cartesian_position,
            CameraMode::Orbit => self.look_at + self.spherical.to_cartesian(),
        }
    }

    /// Forward and right vectors of the camera basis.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let backward = -self.view_vector;
        let right = WORLD_UP.cross(backward).try_normalize().unwrap_or(Vec3::ZERO);
        (self.view_vector, right)
    }

    /// Rotate the free-look view. Vertical rotations that would flip the
    /// camera over a pole are dropped; the horizontal part always applies.
    pub fn rotate_free(&mut self, angle_x: f32, angle_y: f32) {
        if !(angle_x.is_finite() && angle_y.is_finite()) || (angle_x == 0.0 && angle_y == 0.0) {
            return;
        }
        if let Some(side) = WORLD_UP.cross(self.view_vector).try_normalize() {
            let tilted = Quat::from_axis_angle(side, angle_y) * self.view_vector;
            if side.dot(WORLD_UP.cross(tilted)) > 0.0 {
                self.view_vector = tilted;
            }
        }
        let turned = Quat::from_axis_angle(WORLD_UP, -angle_x) * self.view_vector;
        self.view_vector = turned.try_normalize().unwrap_or(self.view_vector);
        self.spherical.theta = wrap_azimuth(self.spherical.theta - angle_x);
    }

    /// Orbit cursor look: elevation follows `dy`, azimuth follows `-dx`.
    pub fn update_spherical_angles(&mut self, dx: f32, dy: f32) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        let k = self.config.orbit_sensitivity;
        self.spherical.phi = clamp_elevation(self.spherical.phi + k * dy, &self.config);
        self.spherical.theta = wrap_azimuth(self.spherical.theta - k * dx);
        self.refresh_orbit_view();
    }

    /// Route a cursor delta in pixels to whichever mode is active.
    pub fn handle_cursor(&mut self, delta: Vec2, viewport: Vec2) {
        if !delta.is_finite() || delta == Vec2::ZERO {
            return;
        }
        match self.mode {
            CameraMode::Free => {
                if viewport.x <= 0.0 || viewport.y <= 0.0 {
                    return;
                }
                let scale = TAU * self.config.look_scale;
                let angle_x = delta.x / (viewport.x * 0.5) * scale;
                let angle_y = delta.y / (viewport.y * 0.5) * scale;
                self.rotate_free(angle_x, angle_y);
            }
            CameraMode::Orbit => self.update_spherical_angles(delta.x, delta.y),
        }
    }

    /// Scroll zoom. Scrolling always returns to orbit mode first; crossing the
    /// distance floor clamps and, when configured, drops into free mode.
    pub fn zoom(&mut self, scroll: f32) {
        if !scroll.is_finite() || scroll == 0.0 {
            return;
        }
        if self.mode == CameraMode::Free {
            self.mode = CameraMode::Orbit;
        }
        let distance = self.spherical.distance - self.config.zoom_step * scroll;
        if distance.is_finite() && distance >= self.config.min_distance {
            self.spherical.distance = distance;
        } else {
            self.spherical.distance = self.config.min_distance;
            if self.config.free_on_min_zoom && distance < self.config.min_distance {
                self.set_mode(CameraMode::Free);
            }
        }
        self.refresh_orbit_view();
    }

    /// Apply one frame of input signals.
    pub fn apply_signals(&mut self, signals: &FrameSignals, viewport: Vec2) {
        self.input = signals.input;
        if signals.toggle_camera {
            self.toggle_mode();
        }
        if !signals.paused {
            self.handle_cursor(signals.cursor_delta, viewport);
        }
        self.zoom(signals.scroll_delta);
    }

    /// Per-frame update: free mode integrates the eye, orbit mode re-derives the view.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.mode {
            CameraMode::Free => {
                let (forward, right) = self.basis();
                let step = self.config.speed * dt;
                if self.input.move_forward {
                    self.cartesian_position += forward * step;
                }
                if self.input.move_back {
                    self.cartesian_position -= forward * step;
                }
                if self.input.move_left {
                    self.cartesian_position -= right * step;
                }
                if self.input.move_right {
                    self.cartesian_position += right * step;
                }
                if self.config.lock_height {
                    self.cartesian_position.y = self.config.ground_height;
                }
            }
            CameraMode::Orbit => self.refresh_orbit_view(),
        }
    }

    /// Right-handed look matrix from the eye along `view_vector`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye_position(), self.view_vector, WORLD_UP)
    }

    /// Perspective projection with the fixed vertical FOV.
    pub fn perspective(&self, aspect_ratio: f32) -> Mat4 {
        let aspect = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            aspect_ratio
        } else {
            1.0
        };
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    fn refresh_orbit_view(&mut self) {
        if self.mode != CameraMode::Orbit {
            return;
        }
        let eye = self.look_at + self.spherical.to_cartesian();
        if let Some(view) = (self.look_at - eye).try_normalize() {
            self.view_vector = view;
        }
    }
}

/// Azimuth folded into `[0, TAU)`.
fn wrap_azimuth(theta: f32) -> f32 {
    if theta.is_finite() { theta.rem_euclid(TAU) } else { 0.0 }
}

fn clamp_elevation(phi: f32, config: &CameraConfig) -> f32 {
    let phi = if phi.is_finite() { phi } else { config.min_elevation };
    phi.clamp(config.min_elevation, config.max_elevation)
        .clamp(-POLE_GUARD, POLE_GUARD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    fn assert_unit(v: Vec3) {
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-5);
    }

    fn free_camera() -> Camera {
        let mut cam = Camera::default();
        cam.set_mode(CameraMode::Free);
        cam
    }

    #[test]
    fn default_camera_is_orbit_with_unit_view() {
        let cam = Camera::default();
        assert_eq!(cam.mode(), CameraMode::Orbit);
        assert_unit(cam.view_vector());
        let m = cam.view_matrix() * cam.perspective(16.0 / 9.0);
        assert!(m.is_finite());
    }

    #[test]
    fn orbit_eye_follows_spherical_formula() {
        let cam = Camera::default();
        let s = cam.spherical();
        let expected = cam.look_at()
            + Vec3::new(
                s.distance * s.phi.cos() * s.theta.sin(),
                s.distance * s.phi.sin(),
                s.distance * s.phi.cos() * s.theta.cos(),
            );
        assert_relative_eq!(cam.eye_position(), expected, epsilon = 1e-6);
        let towards_anchor = (cam.look_at() - cam.eye_position()).normalize();
        assert_relative_eq!(cam.view_vector(), towards_anchor, epsilon = 1e-6);
    }

    #[test]
    fn view_stays_unit_over_mixed_input() {
        let mut cam = Camera::default();
        let viewport = Vec2::new(800.0, 600.0);
        for i in 0..200 {
            let f = i as f32;
            cam.handle_cursor(Vec2::new((f * 0.7).sin() * 40.0, (f * 0.3).cos() * 60.0), viewport);
            if i % 17 == 0 {
                cam.toggle_mode();
            }
            if i % 23 == 0 {
                cam.zoom((f * 0.11).sin() * 30.0);
            }
            cam.update(1.0 / 60.0);
            assert_unit(cam.view_vector());
        }
    }

    #[test]
    fn orbit_distance_never_drops_below_floor() {
        let mut cam = Camera::default();
        for scroll in [1.0, 5.0, 100.0, -3.0, 1.0e6, 250.0] {
            cam.zoom(scroll);
            assert!(cam.spherical().distance >= cam.config().min_distance);
            let orbit_eye = cam.look_at() + cam.spherical().to_cartesian();
            assert!(orbit_eye.distance(cam.look_at()) >= cam.config().min_distance - 1e-5);
        }
    }

    #[test]
    fn large_negative_scroll_zooms_out_in_orbit() {
        let mut cam = Camera::default();
        let before = cam.spherical().distance;
        cam.zoom(-1.0e3);
        assert_eq!(cam.mode(), CameraMode::Orbit);
        assert!(cam.spherical().distance > before);
        assert!(cam.spherical().distance.is_finite());
    }

    #[test]
    fn zooming_past_floor_switches_to_free() {
        let mut cam = Camera::default();
        cam.zoom(1.0e3);
        assert_eq!(cam.spherical().distance, cam.config().min_distance);
        assert_eq!(cam.mode(), CameraMode::Free);
        assert_unit(cam.view_vector());
    }

    #[test]
    fn floor_switch_can_be_disabled() {
        let config = CameraConfig {
            free_on_min_zoom: false,
            ..CameraConfig::default()
        };
        let mut cam = Camera::new(config);
        cam.zoom(1.0e3);
        assert_eq!(cam.mode(), CameraMode::Orbit);
    }

    #[test]
    fn scrolling_in_free_mode_returns_to_orbit() {
        let mut cam = free_camera();
        cam.zoom(-1.0);
        assert_eq!(cam.mode(), CameraMode::Orbit);
    }

    #[test]
    fn orbit_elevation_is_clamped() {
        let mut cam = Camera::default();
        cam.update_spherical_angles(0.0, 1.0e5);
        assert_relative_eq!(cam.spherical().phi, FRAC_PI_4);
        cam.update_spherical_angles(0.0, -1.0e5);
        assert_relative_eq!(cam.spherical().phi, 0.0);
        assert_unit(cam.view_vector());
    }

    #[test]
    fn orbit_drag_right_decreases_azimuth() {
        let mut cam = Camera::default();
        let before = cam.spherical().theta;
        cam.handle_cursor(Vec2::new(100.0, 0.0), Vec2::new(800.0, 800.0));
        assert_relative_eq!(cam.spherical().theta, (before - 0.3).rem_euclid(TAU), epsilon = 1e-5);
    }

    #[test]
    fn free_look_small_tilt_is_accepted() {
        let mut cam = free_camera();
        cam.rotate_free(0.0, 0.0);
        let horizontal = Vec3::new(cam.view_vector().x, 0.0, cam.view_vector().z).normalize();
        cam.view_vector = horizontal;
        cam.rotate_free(0.0, 0.1);
        assert!(cam.view_vector().y < 0.0);
        assert_unit(cam.view_vector());
    }

    #[test]
    fn free_look_rejects_flip_over_pole() {
        let mut cam = free_camera();
        cam.view_vector = Vec3::NEG_Z;
        cam.rotate_free(0.0, 3.0);
        assert_relative_eq!(cam.view_vector(), Vec3::NEG_Z, epsilon = 1e-6);
    }

    #[test]
    fn free_look_horizontal_turns_right_and_tracks_azimuth() {
        let mut cam = free_camera();
        cam.view_vector = Vec3::NEG_Z;
        let theta = cam.spherical().theta;
        cam.rotate_free(std::f32::consts::FRAC_PI_2, 0.0);
        assert_relative_eq!(cam.view_vector(), Vec3::X, epsilon = 1e-5);
        let expected = (theta - std::f32::consts::FRAC_PI_2).rem_euclid(TAU);
        assert_relative_eq!(cam.spherical().theta, expected, epsilon = 1e-5);
    }

    #[test]
    fn free_update_integrates_and_locks_height() {
        let mut cam = free_camera();
        cam.view_vector = Vec3::new(0.0, -0.6, -0.8);
        let start = cam.eye_position();
        cam.set_input(InputState {
            move_forward: true,
            ..InputState::default()
        });
        cam.update(0.5);
        let eye = cam.eye_position();
        assert_relative_eq!(eye.z, start.z - 0.8, epsilon = 1e-5);
        assert_eq!(eye.y, cam.config().ground_height);
    }

    #[test]
    fn free_strafe_right_moves_along_positive_x() {
        let mut cam = free_camera();
        cam.view_vector = Vec3::NEG_Z;
        let start = cam.eye_position();
        cam.set_input(InputState {
            move_right: true,
            ..InputState::default()
        });
        cam.update(1.0);
        assert_relative_eq!(cam.eye_position().x, start.x + 2.0, epsilon = 1e-5);
    }

    #[test]
    fn orbit_update_ignores_movement_flags() {
        let mut cam = Camera::default();
        let eye = cam.eye_position();
        cam.set_input(InputState {
            move_forward: true,
            ..InputState::default()
        });
        cam.update(1.0);
        assert_relative_eq!(cam.eye_position(), eye);
    }

    #[test]
    fn azimuth_stays_wrapped_over_long_drags() {
        let mut cam = Camera::default();
        for _ in 0..10_000 {
            cam.update_spherical_angles(250.0, 0.0);
            cam.rotate_free(-0.9, 0.0);
        }
        let theta = cam.spherical().theta;
        assert!((0.0..=TAU).contains(&theta), "theta {theta} escaped [0, TAU]");
        assert_unit(cam.view_vector());
    }

    #[test]
    fn negative_start_azimuth_is_folded() {
        let config = CameraConfig {
            start_azimuth: -FRAC_PI_4,
            ..CameraConfig::default()
        };
        let cam = Camera::new(config);
        assert_relative_eq!(cam.spherical().theta, TAU - FRAC_PI_4, epsilon = 1e-5);
    }

    #[test]
    fn new_camera_eye_comes_from_orbit_coordinates() {
        let cam = Camera::default();
        let orbit_eye = cam.look_at() + cam.spherical().to_cartesian();
        assert_relative_eq!(cam.cartesian_position, orbit_eye, epsilon = 1e-6);
        assert_relative_eq!(
            cam.view_vector(),
            (cam.look_at() - orbit_eye).normalize(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn entering_free_mode_keeps_eye() {
        let mut cam = Camera::default();
        let eye = cam.eye_position();
        cam.toggle_mode();
        assert_relative_eq!(cam.eye_position(), eye);
    }

    #[test]
    fn degenerate_aspect_falls_back() {
        let cam = Camera::default();
        assert_eq!(cam.perspective(0.0), cam.perspective(1.0));
        assert!(cam.perspective(f32::NAN).is_finite());
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let mut cam = Camera::default();
        let s = cam.spherical();
        cam.zoom(f32::INFINITY);
        cam.update_spherical_angles(f32::NAN, 1.0);
        cam.handle_cursor(Vec2::new(f32::NAN, 0.0), Vec2::splat(800.0));
        assert_eq!(cam.spherical(), s);
    }

    #[test]
    fn signals_toggle_and_route_cursor() {
        let mut cam = Camera::default();
        let signals = FrameSignals {
            toggle_camera: true,
            cursor_delta: Vec2::new(10.0, 0.0),
            ..FrameSignals::default()
        };
        cam.apply_signals(&signals, Vec2::splat(800.0));
        assert_eq!(cam.mode(), CameraMode::Free);
        assert_unit(cam.view_vector());
    }
}
