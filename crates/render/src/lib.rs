//! Rendering Adapter: renderer-agnostic draw submission.
//!
//! # Invariants
//! - Renderers only read a finished frame and the session state; they never mutate either.
//! - Draw order is the order of the frame's draw list.
//!
//! Mesh and texture upload belong to the windowing backend. The debug text
//! renderer stands in for it in headless runs and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "blitz-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
