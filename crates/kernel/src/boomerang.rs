//! Boomerang flight: a small state machine stepped as a pure function.
//!
//! `Idle -> (throw requested) -> Primary | Secondary -> Idle`. Primary flight
//! is a straight line along the launch direction; secondary flight follows a
//! quadratic Bézier curve that bends to the side of the launch direction.
//! Either flight ends once the boomerang is farther than its range from the
//! launch point (measured in XZ) or leaves the arena.

use blitz_common::{Aabb, HalfExtents};
use blitz_input::AttackKind;
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::box_escapes;
use crate::config::BoomerangConfig;

/// Slack on the range check so a flight that lands exactly on its range still counts.
const RANGE_EPSILON: f32 = 1.0e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flight {
    Idle,
    /// Straight-line throw.
    Primary,
    /// Curved throw.
    Secondary,
}

impl Flight {
    fn for_attack(kind: AttackKind) -> Self {
        match kind {
            AttackKind::Primary => Self::Primary,
            AttackKind::Secondary => Self::Secondary,
        }
    }
}

/// Everything that changes while the boomerang flies.
#[derive(Debug, Clone, PartialEq)]
pub struct BoomerangState {
    pub flight: Flight,
    pub position: Vec3,
    /// Launch point. Anchors the range check and the curve.
    pub original_position: Vec3,
    pub direction: Vec3,
    pub spin_angle: f32,
    /// Curve parameter of the secondary flight.
    pub t: f32,
    /// A throw latched while idle, launched on the next unpaused step.
    pub throw_request: Option<AttackKind>,
    pub bbox: Aabb,
}

impl Default for BoomerangState {
    fn default() -> Self {
        Self {
            flight: Flight::Idle,
            position: Vec3::ZERO,
            original_position: Vec3::ZERO,
            direction: Vec3::Z,
            spin_angle: 0.0,
            t: 0.0,
            throw_request: None,
            bbox: Aabb::default(),
        }
    }
}

impl BoomerangState {
    pub fn is_flying(&self) -> bool {
        self.flight != Flight::Idle
    }

    /// Latch a throw. Ignored while a flight or another request is pending.
    pub fn request_throw(&mut self, kind: AttackKind) -> bool {
        if self.is_flying() || self.throw_request.is_some() {
            return false;
        }
        self.throw_request = Some(kind);
        true
    }

    fn land(&mut self) {
        self.flight = Flight::Idle;
        self.spin_angle = 0.0;
        self.t = 0.0;
    }
}

/// Per-frame context the boomerang reads from the rest of the simulation.
#[derive(Debug, Clone, Copy)]
pub struct BoomerangInput {
    pub paused: bool,
    pub player_position: Vec3,
    pub player_yaw: f32,
    pub arena: Aabb,
}

/// Immutable boomerang parameters plus its cached geometry.
#[derive(Debug, Clone)]
pub struct Boomerang {
    config: BoomerangConfig,
    half_extents: HalfExtents,
}

impl Boomerang {
    pub fn new(config: BoomerangConfig) -> Self {
        let half_extents = HalfExtents::from_mesh_bounds(config.mesh_bounds, config.scale);
        Self {
            config,
            half_extents,
        }
    }

    pub fn config(&self) -> &BoomerangConfig {
        &self.config
    }

    fn range(&self, flight: Flight) -> f32 {
        match flight {
            Flight::Secondary => self.config.secondary_range,
            _ => self.config.primary_range,
        }
    }

    /// Snap to the player's hand and start the flight selected by `kind`.
    pub fn launch(
        &self,
        kind: AttackKind,
        player_position: Vec3,
        player_yaw: f32,
    ) -> BoomerangState {
        let origin = player_position + Vec3::Y * self.config.carry_height;
        let direction = (Quat::from_rotation_y(player_yaw) * self.config.launch_offset)
            .try_normalize()
            .unwrap_or(Vec3::Z);
        BoomerangState {
            flight: Flight::for_attack(kind),
            position: origin,
            original_position: origin,
            direction,
            spin_angle: 0.0,
            t: 0.0,
            throw_request: None,
            bbox: Aabb::around(origin, self.half_extents),
        }
    }

    /// Bézier control points of the secondary flight.
    pub fn control_points(&self, state: &BoomerangState) -> [Vec3; 3] {
        let range = self.config.secondary_range;
        let turn = Quat::from_rotation_y(self.config.control_angle_degrees.to_radians());
        let side = turn * state.direction;
        let p0 = state.original_position;
        [
            p0,
            p0 + side * (self.config.control_ratio * range),
            p0 + state.direction * range,
        ]
    }

    /// Advance one frame. Returns the next state and whether it should be drawn.
    ///
    /// While paused nothing moves and no transition happens.
    pub fn step(
        &self,
        state: &BoomerangState,
        input: &BoomerangInput,
        dt: f32,
    ) -> (BoomerangState, bool) {
        let mut next = state.clone();
        if input.paused {
            let visible = next.is_flying() && !box_escapes(&next.bbox, &input.arena);
            return (next, visible);
        }

        match next.flight {
            Flight::Idle => {
                let Some(kind) = next.throw_request else {
                    return (next, false);
                };
                next = self.launch(kind, input.player_position, input.player_yaw);
                tracing::debug!(
                    flight = ?next.flight,
                    direction = ?next.direction,
                    "boomerang thrown"
                );
            }
            Flight::Primary => {
                next.position += next.direction * self.config.speed * dt;
                next.spin_angle += self.config.spin_increment;
            }
            Flight::Secondary => {
                next.t += 0.5 * self.config.speed * dt;
                let [p0, p1, p2] = self.control_points(&next);
                next.position = bezier_point(p0, p1, p2, next.t);
                next.spin_angle += self.config.spin_increment;
            }
        }

        let offset = next.position - next.original_position;
        let travelled = offset.x.hypot(offset.z);
        if travelled > self.range(next.flight) + RANGE_EPSILON {
            tracing::debug!(travelled, "boomerang reached its range");
            next.land();
            return (next, false);
        }

        next.bbox = Aabb::around(next.position, self.half_extents);
        if box_escapes(&next.bbox, &input.arena) {
            tracing::debug!(position = ?next.position, "boomerang left the arena");
            next.land();
            return (next, false);
        }
        (next, true)
    }

    /// Model matrix: spin about the travel direction on top of the resting tilt.
    pub fn transform(&self, state: &BoomerangState) -> Mat4 {
        let axis = state.direction.try_normalize().unwrap_or(Vec3::Z);
        Mat4::from_translation(state.position)
            * Mat4::from_scale(self.config.scale)
            * Mat4::from_axis_angle(axis, state.spin_angle)
            * Mat4::from_rotation_x(self.config.rest_rotation)
    }
}

/// Quadratic Bézier point at parameter `t`.
pub fn bezier_point(p0: Vec3, p1: Vec3, p2: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}
