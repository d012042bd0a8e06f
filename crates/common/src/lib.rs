//! Shared spatial types for the boomerang blitz simulation.
//!
//! # Invariants
//! - Bounding boxes are axis-aligned and flat in Y; collisions live in the XZ plane.
//! - Half extents are cached once from mesh bounds and never recomputed per frame.

pub mod types;

pub use types::{Aabb, HalfExtents, MeshBounds, Role, world_transform};

pub fn crate_info() -> &'static str {
    "blitz-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
