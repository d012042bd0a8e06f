use blitz_input::{Action, AttackKind, MoveKey};
use clap::ValueEnum;

/// Cursor position the scripts start from, in pixels.
const CURSOR_ORIGIN: (f64, f64) = (640.0, 360.0);

/// Canned input sequences for headless sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Script {
    /// Unpause and stand still.
    Idle,
    /// Strafe left and right while orbiting the camera.
    Strafe,
    /// Throw the boomerang on a fixed rhythm while turning.
    Throw,
}

impl Script {
    /// Frames between direction swaps when strafing.
    const STRAFE_PERIOD: u64 = 90;
    /// Frames between throws.
    const THROW_PERIOD: u64 = 30;

    /// Actions the window layer would deliver before `frame` is simulated.
    pub fn actions(self, frame: u64) -> Vec<Action> {
        let mut actions = Vec::new();
        if frame == 0 {
            actions.push(Action::TogglePause);
            actions.push(cursor_at(frame, 0.0));
        }
        match self {
            Self::Idle => {}
            Self::Strafe => {
                if frame % Self::STRAFE_PERIOD == 0 {
                    let right = (frame / Self::STRAFE_PERIOD) % 2 == 0;
                    actions.push(Action::Key {
                        key: MoveKey::Left,
                        pressed: !right,
                    });
                    actions.push(Action::Key {
                        key: MoveKey::Right,
                        pressed: right,
                    });
                }
                actions.push(cursor_at(frame, 2.0));
            }
            Self::Throw => {
                let throw = frame / Self::THROW_PERIOD;
                let kind = if throw % 2 == 0 {
                    AttackKind::Primary
                } else {
                    AttackKind::Secondary
                };
                match frame % Self::THROW_PERIOD {
                    0 => actions.push(Action::Attack {
                        kind,
                        pressed: true,
                    }),
                    1 => actions.push(Action::Attack {
                        kind,
                        pressed: false,
                    }),
                    _ => {}
                }
                actions.push(cursor_at(frame, 4.0));
            }
        }
        actions
    }
}

fn cursor_at(frame: u64, pixels_per_frame: f64) -> Action {
    Action::CursorMoved {
        x: CURSOR_ORIGIN.0 + frame as f64 * pixels_per_frame,
        y: CURSOR_ORIGIN.1,
    }
}
