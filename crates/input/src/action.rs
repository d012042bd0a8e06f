use serde::{Deserialize, Serialize};

/// Movement keys, independent of the physical layout that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
}

/// Which attack trigger fired. Selects the boomerang trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    /// Straight-line throw.
    Primary,
    /// Curved throw.
    Secondary,
}

/// A high-level action produced by the window/input collaborator.
///
/// The simulation never sees key codes or mouse buttons, only these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// A movement key was pressed or released.
    Key { key: MoveKey, pressed: bool },
    /// An attack trigger was pressed or released.
    Attack { kind: AttackKind, pressed: bool },
    /// Absolute cursor position in screen pixels.
    CursorMoved { x: f64, y: f64 },
    /// Vertical scroll offset.
    Scroll(f64),
    /// Flip the pause state.
    TogglePause,
    /// Flip between free and orbit camera.
    ToggleCamera,
    /// Close the session.
    Quit,
}
