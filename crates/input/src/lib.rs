//! Input signals: abstract actions from the window layer latched into per-frame signals.
//!
//! # Invariants
//! - The simulation consumes signals, never raw window events.
//! - Pausing clears every latched movement and attack flag.
//! - Cursor motion while paused never produces a look delta.

pub mod action;
pub mod state;

pub use action::{Action, AttackKind, MoveKey};
pub use state::{Controls, FrameSignals, InputState};

pub fn crate_info() -> &'static str {
    "blitz-input v0.1.0"
}
