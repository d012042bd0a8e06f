use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Fixed identity of everything the simulation draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Scenery,
    Player,
    Zombie,
    Boomerang,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Self::Scenery => "scenery",
            Self::Player => "player",
            Self::Zombie => "zombie",
            Self::Boomerang => "boomerang",
        }
    }
}

/// Object-space bounding box of a loaded mesh, as reported by the geometry loader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl MeshBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds of a mesh spanning [-1, 1] on every axis.
    pub fn unit_cube() -> Self {
        Self {
            min: Vec3::splat(-1.0),
            max: Vec3::ONE,
        }
    }
}

impl Default for MeshBounds {
    fn default() -> Self {
        Self::unit_cube()
    }
}

/// Scaled half widths of an entity on the X and Z axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HalfExtents {
    pub x: f32,
    pub z: f32,
}

impl HalfExtents {
    pub fn new(x: f32, z: f32) -> Self {
        Self {
            x: x.abs(),
            z: z.abs(),
        }
    }

    /// Cache the half widths of a mesh after applying the entity scale.
    pub fn from_mesh_bounds(bounds: MeshBounds, scale: Vec3) -> Self {
        Self::new(
            (bounds.max.x - bounds.min.x) * 0.5 * scale.x,
            (bounds.max.z - bounds.min.z) * 0.5 * scale.z,
        )
    }
}

/// Axis-aligned bounding box. Entity boxes are flat strips at the entity height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box recentred on `position`, degenerate in Y.
    pub fn around(position: Vec3, half: HalfExtents) -> Self {
        Self {
            min: Vec3::new(position.x - half.x, position.y, position.z - half.z),
            max: Vec3::new(position.x + half.x, position.y, position.z + half.z),
        }
    }

    /// Midpoint of the box projected onto the XZ plane.
    pub fn center_xz(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Half of the XZ diagonal between the corners.
    pub fn radius_xz(&self) -> f32 {
        Vec2::new(self.max.x - self.min.x, self.max.z - self.min.z).length() * 0.5
    }
}

/// Model matrix `translate * scale * rotate_y(yaw)` handed to the renderer.
pub fn world_transform(position: Vec3, scale: Vec3, yaw: f32) -> Mat4 {
    Mat4::from_translation(position) * Mat4::from_scale(scale) * Mat4::from_rotation_y(yaw)
}
