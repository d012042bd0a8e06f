use glam::{DVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::action::{Action, AttackKind, MoveKey};

/// Latched input flags read by the camera and the player each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    pub move_forward: bool,
    pub move_back: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub primary_fire: bool,
    pub secondary_fire: bool,
}

impl InputState {
    pub fn set_key(&mut self, key: MoveKey, pressed: bool) {
        match key {
            MoveKey::Forward => self.move_forward = pressed,
            MoveKey::Back => self.move_back = pressed,
            MoveKey::Left => self.move_left = pressed,
            MoveKey::Right => self.move_right = pressed,
        }
    }

    pub fn set_attack(&mut self, kind: AttackKind, pressed: bool) {
        match kind {
            AttackKind::Primary => self.primary_fire = pressed,
            AttackKind::Secondary => self.secondary_fire = pressed,
        }
    }

    /// The attack currently held. Primary wins when both triggers are down.
    pub fn attack(&self) -> Option<AttackKind> {
        if self.primary_fire {
            Some(AttackKind::Primary)
        } else if self.secondary_fire {
            Some(AttackKind::Secondary)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Everything the simulation consumes from the input layer for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameSignals {
    pub input: InputState,
    pub paused: bool,
    /// One-shot request to flip the camera mode.
    pub toggle_camera: bool,
    /// Accumulated cursor motion in pixels since the previous frame.
    pub cursor_delta: Vec2,
    /// Accumulated scroll since the previous frame.
    pub scroll_delta: f32,
    pub quit: bool,
}

/// Turns a stream of [`Action`]s into per-frame [`FrameSignals`].
#[derive(Debug, Clone)]
pub struct Controls {
    input: InputState,
    paused: bool,
    last_cursor: Option<DVec2>,
    cursor_delta: DVec2,
    scroll_delta: f64,
    toggle_camera: bool,
    quit: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

impl Controls {
    /// Sessions start paused until the player unpauses.
    pub fn new() -> Self {
        Self {
            input: InputState::default(),
            paused: true,
            last_cursor: None,
            cursor_delta: DVec2::ZERO,
            scroll_delta: 0.0,
            toggle_camera: false,
            quit: false,
        }
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Apply one action to the latch.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit = true,
            Action::ToggleCamera => self.toggle_camera = !self.toggle_camera,
            Action::TogglePause => {
                self.paused = !self.paused;
                if self.paused {
                    self.input.clear();
                }
                tracing::debug!(paused = self.paused, "pause toggled");
            }
            Action::Scroll(dy) => {
                if dy.is_finite() {
                    self.scroll_delta += dy;
                }
            }
            Action::CursorMoved { x, y } => self.cursor_moved(DVec2::new(x, y)),
            Action::Key { key, pressed } => {
                if !self.paused {
                    self.input.set_key(key, pressed);
                }
            }
            Action::Attack { kind, pressed } => {
                if !self.paused {
                    self.input.set_attack(kind, pressed);
                }
            }
        }
    }

    fn cursor_moved(&mut self, pos: DVec2) {
        if !pos.is_finite() {
            return;
        }
        if let Some(last) = self.last_cursor {
            if !self.paused {
                self.cursor_delta += pos - last;
            }
        }
        self.last_cursor = Some(pos);
    }

    /// Drain the accumulated deltas and one-shot requests for this frame.
    pub fn take_frame(&mut self) -> FrameSignals {
        let signals = FrameSignals {
            input: self.input,
            paused: self.paused,
            toggle_camera: self.toggle_camera,
            cursor_delta: self.cursor_delta.as_vec2(),
            scroll_delta: self.scroll_delta as f32,
            quit: self.quit,
        };
        self.cursor_delta = DVec2::ZERO;
        self.scroll_delta = 0.0;
        self.toggle_camera = false;
        signals
    }
}
