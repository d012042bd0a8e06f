//! Blitz Kernel: camera, collisions, entities, boomerang flight, zombie waves and
//! the per-frame simulation step.
//!
//! # Invariants
//! - The camera view vector stays unit length; the orbit eye never reaches the anchor.
//! - The player never ends a step outside the arena box.
//! - Nothing moves and no flight starts while the session is paused.
//! - Game over is sticky for the rest of a session.

pub mod boomerang;
pub mod camera;
pub mod collision;
pub mod config;
pub mod entity;
pub mod simulation;
pub mod spawner;

pub use boomerang::{Boomerang, BoomerangInput, BoomerangState, Flight, bezier_point};
pub use camera::{Camera, CameraMode, SphericalPosition, WORLD_UP};
pub use collision::{box_contains, box_escapes, box_overlaps_cylinder, cylinder_overlap};
pub use config::{
    ArenaConfig, BoomerangConfig, CameraConfig, ConfigError, GameConfig, PlayerConfig,
    SpawnerConfig,
};
pub use entity::{Body, Player, Scenery, Zombie, facing_yaw};
pub use simulation::{
    DrawItem, Frame, FrameClock, SessionStats, Simulation, SimulationState, StepStatus,
};
pub use spawner::Spawner;

pub fn crate_info() -> &'static str {
    "blitz-kernel v0.1.0"
}
