//! Pure collision predicates over flat axis-aligned boxes.
//!
//! All tests work in the XZ plane. Entities are approximated either by their
//! box or by the circle circumscribing it (center = box midpoint, radius =
//! half the box diagonal).

use blitz_common::Aabb;
use glam::Vec2;

/// True when `inner` lies fully inside `outer` on X and Z.
pub fn box_contains(inner: &Aabb, outer: &Aabb) -> bool {
    inner.min.x >= outer.min.x
        && inner.max.x <= outer.max.x
        && inner.min.z >= outer.min.z
        && inner.max.z <= outer.max.z
}

/// Boundary test: true when `inner` has escaped `outer`.
pub fn box_escapes(inner: &Aabb, outer: &Aabb) -> bool {
    !box_contains(inner, outer)
}

/// Circle-circle overlap of the two boxes' circumscribed circles. Touching counts.
pub fn cylinder_overlap(a: &Aabb, b: &Aabb) -> bool {
    let reach = a.radius_xz() + b.radius_xz();
    a.center_xz().distance_squared(b.center_xz()) <= reach * reach
}

/// Closest-point test between a cylinder (circumscribing `cylinder`) and the
/// box `target`. Compares squared distances only.
pub fn box_overlaps_cylinder(cylinder: &Aabb, target: &Aabb) -> bool {
    let center = cylinder.center_xz();
    let radius = cylinder.radius_xz();
    let closest = center.clamp(
        Vec2::new(target.min.x, target.min.z),
        Vec2::new(target.max.x, target.max.z),
    );
    center.distance_squared(closest) <= radius * radius
}
