use blitz_kernel::{Frame, SimulationState, StepStatus};
use glam::Vec3;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes one finished frame: matrices, draw list and the
/// session counters for the HUD.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    fn render(&self, frame: &Frame, state: &SimulationState) -> Self::Output;
}

/// Human-readable dump of a frame, one line per draw item.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Also print each item's bounding box.
    pub show_boxes: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boxes() -> Self {
        Self { show_boxes: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &Frame, state: &SimulationState) -> String {
        let mut out = String::new();
        let status = match frame.status {
            StepStatus::Continue => "running",
            StepStatus::GameOver => "game over",
        };
        out.push_str(&format!(
            "=== Frame {} ({status}{}) ===\n",
            state.stats.frames,
            if state.paused { ", paused" } else { "" }
        ));
        out.push_str(&format!(
            "Phase {}: kills={} spawned={} live={} total_kills={}\n",
            state.phase(),
            state.spawner.kills(),
            state.spawner.spawned(),
            state.zombies.len(),
            state.stats.total_kills
        ));
        let eye = frame.view.inverse().transform_point3(Vec3::ZERO);
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) dt={:.4}\n",
            eye.x, eye.y, eye.z, frame.dt
        ));

        for item in &frame.draws {
            let p = item.model.w_axis;
            out.push_str(&format!(
                "  {:<9} pos=({:.2}, {:.2}, {:.2})",
                item.role.name(),
                p.x,
                p.y,
                p.z
            ));
            if self.show_boxes {
                out.push_str(&format!(
                    " box=[({:.2}, {:.2})..({:.2}, {:.2})]",
                    item.bbox.min.x, item.bbox.min.z, item.bbox.max.x, item.bbox.max.z
                ));
            }
            out.push('\n');
        }

        out
    }
}
