//! Game tuning loaded from YAML, with calibrated defaults for every field.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::path::Path;

use blitz_common::MeshBounds;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a [`GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite and > 0, got {value}")))
    }
}

/// Camera tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Free-camera travel speed in units per second.
    pub speed: f32,
    /// Orbit radians per pixel of cursor motion.
    pub orbit_sensitivity: f32,
    /// Multiplier on the free-look angle derived from the viewport fraction.
    pub look_scale: f32,
    /// Orbit distance change per unit of scroll.
    pub zoom_step: f32,
    /// Orbit distance floor.
    pub min_distance: f32,
    /// Orbit elevation clamp, radians. Must stay strictly inside the poles.
    pub min_elevation: f32,
    pub max_elevation: f32,
    /// Zooming past the floor drops into free camera.
    pub free_on_min_zoom: bool,
    /// Pin the free camera to `ground_height` while moving.
    pub lock_height: bool,
    pub ground_height: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub start_look_at: Vec3,
    pub start_elevation: f32,
    pub start_azimuth: f32,
    pub start_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            orbit_sensitivity: 0.003,
            look_scale: 1.0,
            zoom_step: 0.1,
            min_distance: 0.5,
            min_elevation: 0.0,
            max_elevation: FRAC_PI_4,
            free_on_min_zoom: true,
            lock_height: true,
            ground_height: 0.8,
            fov_degrees: 60.0,
            near: 0.1,
            far: 100.0,
            start_look_at: Vec3::new(0.5, 0.8, 0.0),
            start_elevation: 0.3,
            start_azimuth: 0.0,
            start_distance: 2.5,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("camera.speed", self.speed)?;
        positive("camera.orbit_sensitivity", self.orbit_sensitivity)?;
        positive("camera.look_scale", self.look_scale)?;
        positive("camera.zoom_step", self.zoom_step)?;
        positive("camera.min_distance", self.min_distance)?;
        positive("camera.near", self.near)?;
        positive("camera.far", self.far)?;
        if self.near >= self.far {
            return Err(invalid("camera.near", "must be below camera.far"));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must be in (0, 180)"));
        }
        if !(self.min_elevation > -FRAC_PI_2 && self.max_elevation < FRAC_PI_2) {
            return Err(invalid(
                "camera.max_elevation",
                "elevation clamp must stay strictly inside (-pi/2, pi/2)",
            ));
        }
        if self.min_elevation > self.max_elevation {
            return Err(invalid(
                "camera.min_elevation",
                "must not exceed camera.max_elevation",
            ));
        }
        if !self.start_distance.is_finite() {
            return Err(invalid("camera.start_distance", "must be finite"));
        }
        Ok(())
    }
}

/// Player locomotion and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f32,
    /// Height above the player the orbit camera tracks.
    pub eye_height: f32,
    pub start_position: Vec3,
    /// Model-space facing of the player mesh.
    pub facing: Vec3,
    pub scale: Vec3,
    pub mesh_bounds: MeshBounds,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            eye_height: 0.8,
            start_position: Vec3::new(0.4, 0.0, 0.0),
            facing: Vec3::Z,
            scale: Vec3::ONE,
            mesh_bounds: MeshBounds::new(Vec3::new(-0.15, 0.0, -0.15), Vec3::new(0.15, 0.8, 0.15)),
        }
    }
}

/// Boomerang flight tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoomerangConfig {
    pub speed: f32,
    pub primary_range: f32,
    pub secondary_range: f32,
    /// Spin added per simulated frame, radians.
    pub spin_increment: f32,
    /// Distance of the curve's middle control point as a fraction of the range.
    pub control_ratio: f32,
    /// Angle of the middle control point from the launch direction, degrees.
    pub control_angle_degrees: f32,
    /// Direction rotated by the player's yaw to get the launch direction.
    pub launch_offset: Vec3,
    /// Height above the player's feet the boomerang is thrown from.
    pub carry_height: f32,
    /// Resting tilt about X applied before the spin.
    pub rest_rotation: f32,
    pub scale: Vec3,
    pub mesh_bounds: MeshBounds,
}

impl Default for BoomerangConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            primary_range: 3.0,
            secondary_range: 4.0,
            spin_increment: 0.2,
            control_ratio: 0.7,
            control_angle_degrees: 90.0,
            launch_offset: Vec3::Z,
            carry_height: 0.7,
            rest_rotation: FRAC_PI_2,
            scale: Vec3::splat(0.01),
            mesh_bounds: MeshBounds::new(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 1.0, 10.0)),
        }
    }
}

impl BoomerangConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("boomerang.speed", self.speed)?;
        positive("boomerang.primary_range", self.primary_range)?;
        positive("boomerang.secondary_range", self.secondary_range)?;
        if !self.spin_increment.is_finite() {
            return Err(invalid("boomerang.spin_increment", "must be finite"));
        }
        if !(self.carry_height.is_finite() && self.control_angle_degrees.is_finite()) {
            return Err(invalid(
                "boomerang.carry_height",
                "carry height and control angle must be finite",
            ));
        }
        if !(0.0..=1.0).contains(&self.control_ratio) {
            return Err(invalid("boomerang.control_ratio", "must be in [0, 1]"));
        }
        if self.launch_offset.length_squared() <= f32::EPSILON {
            return Err(invalid("boomerang.launch_offset", "must be non-zero"));
        }
        Ok(())
    }
}

/// Zombie wave and phase progression tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Zombies per wave, spread evenly around the spawn circle.
    pub wave_size: usize,
    /// Seconds between waves in phase 0.
    pub base_interval: f32,
    /// Seconds removed from the interval per phase.
    pub interval_step: f32,
    pub min_interval: f32,
    /// Distance of the spawn points from the arena centre.
    pub spawn_radius: f32,
    pub base_speed: f32,
    pub speed_step: f32,
    /// Kill/spawn quota per phase; `None` means the phase never ends.
    pub phase_quotas: Vec<Option<u32>>,
    pub scale: Vec3,
    pub mesh_bounds: MeshBounds,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            wave_size: 4,
            base_interval: 5.0,
            interval_step: 1.0,
            min_interval: 1.0,
            spawn_radius: 6.8,
            base_speed: 1.0,
            speed_step: 1.0,
            phase_quotas: vec![Some(16), Some(32), None],
            scale: Vec3::splat(0.5),
            mesh_bounds: MeshBounds::new(Vec3::new(-0.3, 0.0, -0.3), Vec3::new(0.3, 1.6, 0.3)),
        }
    }
}

impl SpawnerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wave_size == 0 {
            return Err(invalid("spawner.wave_size", "must be > 0"));
        }
        positive("spawner.base_interval", self.base_interval)?;
        positive("spawner.min_interval", self.min_interval)?;
        positive("spawner.base_speed", self.base_speed)?;
        positive("spawner.spawn_radius", self.spawn_radius)?;
        if !(self.interval_step.is_finite() && self.interval_step >= 0.0) {
            return Err(invalid("spawner.interval_step", "must be finite and >= 0"));
        }
        if !(self.speed_step.is_finite() && self.speed_step >= 0.0) {
            return Err(invalid("spawner.speed_step", "must be finite and >= 0"));
        }
        if self.phase_quotas.is_empty() {
            return Err(invalid("spawner.phase_quotas", "needs at least one phase"));
        }
        if self.phase_quotas.contains(&Some(0)) {
            return Err(invalid("spawner.phase_quotas", "quotas must be > 0"));
        }
        Ok(())
    }
}

/// The bounded scene the player may not leave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub position: Vec3,
    pub scale: Vec3,
    pub mesh_bounds: MeshBounds,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::splat(8.0),
            mesh_bounds: MeshBounds::unit_cube(),
        }
    }
}

/// Complete tuning for one play session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub camera: CameraConfig,
    pub player: PlayerConfig,
    pub boomerang: BoomerangConfig,
    pub spawner: SpawnerConfig,
    pub arena: ArenaConfig,
}

impl GameConfig {
    /// Parse and validate a YAML document. Missing fields keep their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading game config");
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        positive("player.speed", self.player.speed)?;
        if self.player.facing.length_squared() <= f32::EPSILON {
            return Err(invalid("player.facing", "must be non-zero"));
        }
        self.boomerang.validate()?;
        self.spawner.validate()?;
        if self.arena.scale.cmple(Vec3::ZERO).any() {
            return Err(invalid("arena.scale", "must be positive on every axis"));
        }
        Ok(())
    }
}

/// Elevation cap the camera never crosses even if the config asks for more.
pub(crate) const POLE_GUARD: f32 = FRAC_PI_2 - 1.0e-3;
