use blitz_common::{Aabb, HalfExtents, MeshBounds, world_transform};
use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::collision::box_escapes;
use crate::config::{ArenaConfig, PlayerConfig};

/// Yaw that turns a model facing `model_forward` towards `heading`, in the XZ plane.
pub fn facing_yaw(model_forward: Vec3, heading: Vec3) -> f32 {
    model_forward.z.atan2(model_forward.x) - heading.z.atan2(heading.x)
}

/// Project onto the ground plane and normalize. Zero when the input is vertical.
pub(crate) fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).try_normalize().unwrap_or(Vec3::ZERO)
}

/// Spatial state of a mesh-backed entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec3,
    /// Model-space facing used to derive the yaw.
    pub direction: Vec3,
    pub rotation: f32,
    pub scale: Vec3,
    half_extents: HalfExtents,
    bbox: Aabb,
}

impl Body {
    pub fn new(position: Vec3, direction: Vec3, scale: Vec3, bounds: MeshBounds) -> Self {
        let half_extents = HalfExtents::from_mesh_bounds(bounds, scale);
        Self {
            position,
            direction,
            rotation: 0.0,
            scale,
            half_extents,
            bbox: Aabb::around(position, half_extents),
        }
    }

    pub fn half_extents(&self) -> HalfExtents {
        self.half_extents
    }

    pub fn bbox(&self) -> Aabb {
        self.bbox
    }

    /// Recentre the box on the current position.
    pub fn refresh_bbox(&mut self) {
        self.bbox = Aabb::around(self.position, self.half_extents);
    }

    pub fn transform(&self) -> Mat4 {
        world_transform(self.position, self.scale, self.rotation)
    }
}

/// The static arena. Its box bounds the player and the boomerang.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenery {
    pub body: Body,
}

impl Scenery {
    pub fn from_config(config: &ArenaConfig) -> Self {
        Self {
            body: Body::new(config.position, Vec3::Z, config.scale, config.mesh_bounds),
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.body.bbox()
    }
}

/// The player-controlled robot.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Body,
    speed: f32,
    eye_height: f32,
}

impl Player {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            body: Body::new(
                config.start_position,
                config.facing,
                config.scale,
                config.mesh_bounds,
            ),
            speed: config.speed,
            eye_height: config.eye_height,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn rotation(&self) -> f32 {
        self.body.rotation
    }

    /// Move along the camera basis, refusing any step that would leave `arena`.
    ///
    /// Returns false when a requested move was rejected at the boundary.
    pub fn update(&mut self, dt: f32, camera: &mut Camera, arena: &Aabb) -> bool {
        let (view, right) = camera.basis();
        let forward = planar(view);
        let right = planar(right);
        let input = *camera.input();

        let mut step = Vec3::ZERO;
        if input.move_forward {
            step += forward;
        }
        if input.move_back {
            step -= forward;
        }
        if input.move_left {
            step -= right;
        }
        if input.move_right {
            step += right;
        }

        let mut accepted = true;
        let candidate = self.body.position + step * self.speed * dt;
        if candidate != self.body.position && candidate.is_finite() {
            let candidate_box = Aabb::around(candidate, self.body.half_extents);
            if box_escapes(&candidate_box, arena) {
                tracing::trace!(?candidate, "player move rejected at arena boundary");
                accepted = false;
            } else {
                self.body.position = candidate;
            }
        }
        self.body.refresh_bbox();

        if !camera.is_free() {
            camera.set_look_at(self.body.position + Vec3::Y * self.eye_height);
        }
        if forward != Vec3::ZERO {
            self.body.rotation = facing_yaw(self.body.direction, forward);
        }
        accepted
    }
}

/// A live zombie. Lightweight spawn record, separate from mesh-backed bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct Zombie {
    pub position: Vec3,
    pub direction: Vec3,
    pub rotation: f32,
    pub bbox: Aabb,
    pub speed: f32,
}

impl Zombie {
    pub fn spawn(position: Vec3, speed: f32, half: HalfExtents) -> Self {
        Self {
            position,
            direction: Vec3::Z,
            rotation: 0.0,
            bbox: Aabb::around(position, half),
            speed,
        }
    }

    /// Walk towards `target`. Position is frozen while paused; box and yaw still refresh.
    pub fn chase(&mut self, target: Vec3, dt: f32, paused: bool, half: HalfExtents) {
        let heading = (target - self.position).try_normalize();
        if let Some(heading) = heading {
            if !paused {
                self.position += heading * dt * self.speed;
            }
            self.rotation = facing_yaw(self.direction, heading);
        }
        self.bbox = Aabb::around(self.position, half);
    }

    pub fn transform(&self, scale: Vec3) -> Mat4 {
        world_transform(self.position, scale, self.rotation)
    }
}
