//! Zombie waves and difficulty phases.

use std::f32::consts::TAU;

use blitz_common::HalfExtents;
use glam::Vec3;

use crate::config::SpawnerConfig;
use crate::entity::Zombie;

/// Phase counters and the wave timer.
#[derive(Debug, Clone)]
pub struct Spawner {
    config: SpawnerConfig,
    half_extents: HalfExtents,
    phase: usize,
    kills: u32,
    spawned: u32,
    timer: f32,
}

impl Spawner {
    pub fn new(config: SpawnerConfig) -> Self {
        let half_extents = HalfExtents::from_mesh_bounds(config.mesh_bounds, config.scale);
        Self {
            config,
            half_extents,
            phase: 0,
            kills: 0,
            spawned: 0,
            timer: 0.0,
        }
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    pub fn half_extents(&self) -> HalfExtents {
        self.half_extents
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    /// Kills in the current phase.
    pub fn kills(&self) -> u32 {
        self.kills
    }

    /// Zombies spawned in the current phase.
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Unpaused seconds since the last wave check fired.
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Seconds between waves in the current phase.
    pub fn interval(&self) -> f32 {
        let step = self.config.interval_step * self.phase as f32;
        (self.config.base_interval - step).max(self.config.min_interval)
    }

    pub fn zombie_speed(&self) -> f32 {
        self.config.base_speed + self.config.speed_step * self.phase as f32
    }

    /// Kill and spawn quota of the current phase. `None` is unbounded.
    pub fn quota(&self) -> Option<u32> {
        self.config.phase_quotas.get(self.phase).copied().flatten()
    }

    fn quota_open(&self) -> bool {
        self.quota().is_none_or(|quota| self.spawned < quota)
    }

    pub fn record_kill(&mut self) {
        self.kills += 1;
    }

    /// Advance to the next phase once the kill quota is met. The last phase
    /// in the table is never left.
    pub fn update_phase(&mut self) -> bool {
        let Some(quota) = self.quota() else {
            return false;
        };
        if self.kills < quota || self.phase + 1 >= self.config.phase_quotas.len() {
            return false;
        }
        self.phase += 1;
        self.kills = 0;
        self.spawned = 0;
        tracing::info!(phase = self.phase, interval = self.interval(), "phase advanced");
        true
    }

    /// Spawn positions of one wave, evenly spaced on the spawn circle.
    pub fn spawn_points(&self) -> impl Iterator<Item = Vec3> + '_ {
        let count = self.config.wave_size;
        let radius = self.config.spawn_radius;
        (0..count).map(move |i| {
            let angle = TAU * i as f32 / count as f32;
            Vec3::new(angle.sin() * radius, 0.0, angle.cos() * radius)
        })
    }

    /// Run the wave timer. The timer holds still while paused, so pausing
    /// never builds up pending waves. Returns how many zombies were added.
    pub fn tick(&mut self, dt: f32, paused: bool, pool: &mut Vec<Zombie>) -> usize {
        if paused {
            return 0;
        }
        self.timer += dt;
        if self.timer < self.interval() {
            return 0;
        }
        self.timer = 0.0;
        if !self.quota_open() {
            return 0;
        }

        let speed = self.zombie_speed();
        let before = pool.len();
        let half = self.half_extents;
        pool.extend(self.spawn_points().map(|point| Zombie::spawn(point, speed, half)));
        let added = pool.len() - before;
        self.spawned += added as u32;
        tracing::debug!(
            phase = self.phase,
            added,
            spawned = self.spawned,
            live = pool.len(),
            "zombie wave spawned"
        );
        added
    }
}
