//! The per-frame simulation step and its session state.
//!
//! One call to [`Simulation::frame`] per rendered frame. The step owns every
//! piece of mutable game state through [`SimulationState`]; nothing lives in
//! globals.

use blitz_common::{Aabb, Role};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::boomerang::{Boomerang, BoomerangInput, BoomerangState};
use crate::camera::Camera;
use crate::collision::{box_overlaps_cylinder, cylinder_overlap};
use crate::config::GameConfig;
use crate::entity::{Player, Scenery, Zombie};
use crate::spawner::Spawner;

/// Whether the session goes on after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Continue,
    /// A zombie reached the player. Sticky for the rest of the session.
    GameOver,
}

/// Running totals over the whole session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub frames: u64,
    /// Unpaused seconds simulated.
    pub elapsed: f64,
    pub total_kills: u64,
    pub highest_phase: usize,
}

/// All mutable game state for one play session.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub scenery: Scenery,
    pub player: Player,
    pub boomerang: BoomerangState,
    /// Whether the boomerang was drawn on the last step.
    pub boomerang_visible: bool,
    pub zombies: Vec<Zombie>,
    pub spawner: Spawner,
    pub paused: bool,
    pub game_over: bool,
    pub stats: SessionStats,
}

impl SimulationState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            scenery: Scenery::from_config(&config.arena),
            player: Player::from_config(&config.player),
            boomerang: BoomerangState::default(),
            boomerang_visible: false,
            zombies: Vec::new(),
            spawner: Spawner::new(config.spawner.clone()),
            paused: false,
            game_over: false,
            stats: SessionStats::default(),
        }
    }

    pub fn phase(&self) -> usize {
        self.spawner.phase()
    }
}

/// One entity ready for draw submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub role: Role,
    pub model: Mat4,
    pub bbox: Aabb,
}

/// Output of one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub status: StepStatus,
    pub dt: f32,
    pub view: Mat4,
    pub projection: Mat4,
    pub draws: Vec<DrawItem>,
}

/// Wall-clock bookkeeping between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    last_time: f64,
}

impl FrameClock {
    pub fn new(start: f64) -> Self {
        Self { last_time: start }
    }

    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    /// Seconds since the previous tick. Never negative, never NaN.
    pub fn tick(&mut self, now: f64) -> f32 {
        if !now.is_finite() {
            return 0.0;
        }
        let dt = (now - self.last_time) as f32;
        self.last_time = now;
        if dt.is_finite() { dt.max(0.0) } else { 0.0 }
    }
}

/// Owns the session state and runs the frame pipeline.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: GameConfig,
    boomerang: Boomerang,
    state: SimulationState,
}

impl Simulation {
    pub fn new(config: GameConfig) -> Self {
        let state = SimulationState::new(&config);
        let boomerang = Boomerang::new(config.boomerang.clone());
        Self {
            config,
            boomerang,
            state,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// A camera built from this session's tuning, anchored on the player's eye.
    pub fn camera(&self) -> Camera {
        let mut camera = Camera::new(self.config.camera.clone());
        let eye = self.state.player.position() + Vec3::Y * self.config.player.eye_height;
        camera.set_look_at(eye);
        camera
    }

    /// Tick the clock, step the simulation and collect what to draw.
    pub fn frame(
        &mut self,
        camera: &mut Camera,
        paused: bool,
        aspect_ratio: f32,
        clock: &mut FrameClock,
        now: f64,
    ) -> Frame {
        let dt = clock.tick(now);
        let status = self.step(camera, paused, dt);
        Frame {
            status,
            dt,
            view: camera.view_matrix(),
            projection: camera.perspective(aspect_ratio),
            draws: self.draw_list(),
        }
    }

    /// Advance the session by `dt` seconds.
    pub fn step(&mut self, camera: &mut Camera, paused: bool, dt: f32) -> StepStatus {
        if self.state.game_over {
            return StepStatus::GameOver;
        }
        let _span =
            tracing::trace_span!("simulation_step", frame = self.state.stats.frames).entered();
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let state = &mut self.state;
        state.paused = paused;
        state.stats.frames += 1;
        if !paused {
            state.stats.elapsed += f64::from(dt);
        }

        state.spawner.update_phase();
        state.stats.highest_phase = state.stats.highest_phase.max(state.spawner.phase());
        state.spawner.tick(dt, paused, &mut state.zombies);

        let move_dt = if paused { 0.0 } else { dt };
        camera.update(move_dt);

        if !paused {
            if let Some(kind) = camera.input().attack() {
                if state.boomerang.request_throw(kind) {
                    tracing::debug!(?kind, "throw requested");
                }
            }
        }

        state.scenery.body.refresh_bbox();
        let arena = state.scenery.bounds();
        state.player.update(move_dt, camera, &arena);

        let input = BoomerangInput {
            paused,
            player_position: state.player.position(),
            player_yaw: state.player.rotation(),
            arena,
        };
        let (boomerang, visible) = self.boomerang.step(&state.boomerang, &input, dt);
        state.boomerang = boomerang;
        state.boomerang_visible = visible;

        let player_box = state.player.body.bbox();
        let player_position = state.player.position();
        let boomerang_box = visible.then_some(state.boomerang.bbox);
        let half = state.spawner.half_extents();
        let mut i = 0;
        while i < state.zombies.len() {
            let zombie = &mut state.zombies[i];
            if cylinder_overlap(&zombie.bbox, &player_box) {
                state.game_over = true;
                tracing::info!(
                    phase = state.spawner.phase(),
                    kills = state.stats.total_kills,
                    elapsed = state.stats.elapsed,
                    "game over"
                );
                return StepStatus::GameOver;
            }
            if let Some(target) = boomerang_box {
                if box_overlaps_cylinder(&zombie.bbox, &target) {
                    state.zombies.remove(i);
                    state.spawner.record_kill();
                    state.stats.total_kills += 1;
                    tracing::debug!(kills = state.spawner.kills(), "zombie destroyed");
                    continue;
                }
            }
            zombie.chase(player_position, dt, paused, half);
            i += 1;
        }
        StepStatus::Continue
    }

    /// Scenery, player, zombies, then the boomerang when it is in flight.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let state = &self.state;
        let mut draws = Vec::with_capacity(state.zombies.len() + 3);
        draws.push(DrawItem {
            role: Role::Scenery,
            model: state.scenery.body.transform(),
            bbox: state.scenery.bounds(),
        });
        draws.push(DrawItem {
            role: Role::Player,
            model: state.player.body.transform(),
            bbox: state.player.body.bbox(),
        });
        let zombie_scale = self.config.spawner.scale;
        draws.extend(state.zombies.iter().map(|zombie| DrawItem {
            role: Role::Zombie,
            model: zombie.transform(zombie_scale),
            bbox: zombie.bbox,
        }));
        if state.boomerang_visible {
            draws.push(DrawItem {
                role: Role::Boomerang,
                model: self.boomerang.transform(&state.boomerang),
                bbox: state.boomerang.bbox,
            });
        }
        draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boomerang::Flight;
    use crate::camera::CameraMode;
    use approx::assert_relative_eq;
    use blitz_common::HalfExtents;
    use blitz_input::InputState;

    fn session() -> (Simulation, Camera) {
        let sim = Simulation::new(GameConfig::default());
        let camera = sim.camera();
        (sim, camera)
    }

    fn zombie_at(sim: &Simulation, x: f32, z: f32) -> Zombie {
        Zombie::spawn(Vec3::new(x, 0.0, z), 1.0, sim.state().spawner.half_extents())
    }

    #[test]
    fn zombie_touching_player_ends_the_session() {
        let (mut sim, mut camera) = session();
        let zombie = zombie_at(&sim, 0.4, 0.3);
        sim.state_mut().zombies.push(zombie);
        assert_eq!(sim.step(&mut camera, false, 0.016), StepStatus::GameOver);
        assert!(sim.state().game_over);
    }

    #[test]
    fn game_over_is_sticky() {
        let (mut sim, mut camera) = session();
        let zombie = zombie_at(&sim, 0.4, 0.3);
        sim.state_mut().zombies.push(zombie);
        sim.step(&mut camera, false, 0.016);
        let frames = sim.state().stats.frames;
        assert_eq!(sim.step(&mut camera, false, 0.016), StepStatus::GameOver);
        assert_eq!(sim.state().stats.frames, frames);
    }

    #[test]
    fn thrown_boomerang_destroys_zombie() {
        let (mut sim, mut camera) = session();
        let zombie = zombie_at(&sim, 0.4, -1.5);
        sim.state_mut().zombies.push(zombie);
        camera.set_input(InputState {
            primary_fire: true,
            ..InputState::default()
        });

        let mut status = StepStatus::Continue;
        for _ in 0..6 {
            status = sim.step(&mut camera, false, 0.1);
        }
        assert_eq!(status, StepStatus::Continue);
        assert!(sim.state().zombies.is_empty());
        assert_eq!(sim.state().stats.total_kills, 1);
        assert_eq!(sim.state().spawner.kills(), 1);
        assert_eq!(sim.state().boomerang.flight, Flight::Primary);
    }

    #[test]
    fn paused_step_freezes_the_world() {
        let (mut sim, mut camera) = session();
        let zombie = zombie_at(&sim, 3.0, 3.0);
        sim.state_mut().zombies.push(zombie.clone());
        camera.set_input(InputState {
            move_forward: true,
            primary_fire: true,
            ..InputState::default()
        });
        let start = sim.state().player.position();
        for _ in 0..100 {
            assert_eq!(sim.step(&mut camera, true, 0.1), StepStatus::Continue);
        }
        let state = sim.state();
        assert_eq!(state.player.position(), start);
        assert_eq!(state.zombies[0].position, zombie.position);
        assert_eq!(state.zombies.len(), 1);
        assert_eq!(state.boomerang.flight, Flight::Idle);
        assert!(state.boomerang.throw_request.is_none());
        assert_eq!(state.stats.elapsed, 0.0);
        assert_eq!(state.stats.frames, 100);
    }

    #[test]
    fn paused_step_freezes_the_free_camera() {
        let (mut sim, mut camera) = session();
        camera.set_mode(CameraMode::Free);
        camera.set_input(InputState {
            move_forward: true,
            move_right: true,
            ..InputState::default()
        });
        let eye = camera.eye_position();
        for _ in 0..10 {
            sim.step(&mut camera, true, 0.1);
        }
        assert_eq!(camera.eye_position(), eye);

        sim.step(&mut camera, false, 0.1);
        assert_ne!(camera.eye_position(), eye);
    }

    #[test]
    fn first_wave_arrives_after_base_interval() {
        let (mut sim, mut camera) = session();
        for _ in 0..9 {
            sim.step(&mut camera, false, 0.5);
        }
        assert!(sim.state().zombies.is_empty());
        sim.step(&mut camera, false, 0.5);
        assert_eq!(sim.state().zombies.len(), 4);
    }

    #[test]
    fn kill_quota_advances_phase_on_next_step() {
        let (mut sim, mut camera) = session();
        for _ in 0..16 {
            sim.state_mut().spawner.record_kill();
        }
        sim.step(&mut camera, false, 0.0);
        assert_eq!(sim.state().phase(), 1);
        assert_eq!(sim.state().spawner.kills(), 0);
        assert_eq!(sim.state().stats.highest_phase, 1);
    }

    #[test]
    fn player_moves_along_camera_forward() {
        let (mut sim, mut camera) = session();
        camera.set_input(InputState {
            move_forward: true,
            ..InputState::default()
        });
        sim.step(&mut camera, false, 0.5);
        let position = sim.state().player.position();
        assert_relative_eq!(position, Vec3::new(0.4, 0.0, -1.0), epsilon = 1e-5);
        assert_relative_eq!(camera.look_at(), position + Vec3::Y * 0.8, epsilon = 1e-5);
    }

    #[test]
    fn frame_collects_draws_and_matrices() {
        let (mut sim, mut camera) = session();
        let mut clock = FrameClock::new(0.0);
        let frame = sim.frame(&mut camera, false, 16.0 / 9.0, &mut clock, 0.25);
        assert_eq!(frame.status, StepStatus::Continue);
        assert_relative_eq!(frame.dt, 0.25);
        let roles: Vec<Role> = frame.draws.iter().map(|d| d.role).collect();
        assert_eq!(roles, vec![Role::Scenery, Role::Player]);
        assert_eq!(frame.view, camera.view_matrix());
        assert_eq!(frame.projection, camera.perspective(16.0 / 9.0));
    }

    #[test]
    fn boomerang_drawn_only_in_flight() {
        let (mut sim, mut camera) = session();
        camera.set_input(InputState {
            secondary_fire: true,
            ..InputState::default()
        });
        sim.step(&mut camera, false, 0.05);
        let draws = sim.draw_list();
        assert_eq!(draws.last().map(|d| d.role), Some(Role::Boomerang));
        assert_eq!(sim.state().boomerang.flight, Flight::Secondary);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut clock = FrameClock::new(1.0);
        assert_relative_eq!(clock.tick(1.5), 0.5);
        assert_eq!(clock.tick(1.25), 0.0);
        assert_eq!(clock.tick(f64::NAN), 0.0);
        assert_eq!(clock.last_time(), 1.25);
    }

    #[test]
    fn zombies_chase_the_player() {
        let (mut sim, mut camera) = session();
        let half = HalfExtents::new(0.15, 0.15);
        sim.state_mut()
            .zombies
            .push(Zombie::spawn(Vec3::new(0.4, 0.0, 5.0), 2.0, half));
        sim.step(&mut camera, false, 0.5);
        assert_relative_eq!(sim.state().zombies[0].position.z, 4.0, epsilon = 1e-5);
    }
}
