mod script;

use std::path::{Path, PathBuf};

use anyhow::Context;
use blitz_input::Controls;
use blitz_kernel::{CameraMode, FrameClock, GameConfig, SessionStats, Simulation, StepStatus};
use blitz_render::{DebugTextRenderer, Renderer};
use clap::{Parser, Subcommand};
use glam::{Vec2, Vec3};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use script::Script;

/// Picked up from the working directory when no `--config` is given.
const DEFAULT_CONFIG: &str = "blitz.yaml";
const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

#[derive(Parser)]
#[command(name = "blitz-cli", about = "Headless driver for boomerang blitz")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Validate and print the effective config as YAML
    Config {
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run a scripted headless session
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Input sequence to play
        #[arg(short, long, value_enum, default_value_t = Script::Idle)]
        script: Script,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Dump the first K frames with the debug renderer
        #[arg(long, default_value = "0")]
        trace_frames: u64,
    },
}

/// End-of-session report.
#[derive(Debug, Serialize)]
struct RunSummary {
    script: String,
    frames_requested: u64,
    outcome: &'static str,
    phase: usize,
    live_zombies: usize,
    player_position: Vec3,
    camera_mode: CameraMode,
    stats: SessionStats,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    if let Some(path) = path {
        return GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()));
    }
    let fallback = Path::new(DEFAULT_CONFIG);
    if !fallback.exists() {
        return Ok(GameConfig::default());
    }
    match GameConfig::load(fallback) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(
                %err,
                path = DEFAULT_CONFIG,
                "ignoring unreadable config, using defaults"
            );
            Ok(GameConfig::default())
        }
    }
}

fn run_session(
    config: GameConfig,
    script: Script,
    frames: u64,
    dt: f32,
    trace_frames: u64,
) -> RunSummary {
    let mut sim = Simulation::new(config);
    let mut camera = sim.camera();
    let mut controls = Controls::new();
    let mut clock = FrameClock::new(0.0);
    let renderer = DebugTextRenderer::with_boxes();
    let aspect = VIEWPORT.x / VIEWPORT.y;

    let mut status = StepStatus::Continue;
    for frame in 0..frames {
        for action in script.actions(frame) {
            controls.apply(action);
        }
        let signals = controls.take_frame();
        if signals.quit {
            break;
        }
        camera.apply_signals(&signals, VIEWPORT);

        let now = (frame + 1) as f64 * f64::from(dt);
        let output = sim.frame(&mut camera, signals.paused, aspect, &mut clock, now);
        if frame < trace_frames {
            print!("{}", renderer.render(&output, sim.state()));
        }
        status = output.status;
        if status == StepStatus::GameOver {
            break;
        }
    }

    let state = sim.state();
    RunSummary {
        script: format!("{script:?}").to_lowercase(),
        frames_requested: frames,
        outcome: match status {
            StepStatus::Continue => "survived",
            StepStatus::GameOver => "game over",
        },
        phase: state.phase(),
        live_zombies: state.zombies.len(),
        player_position: state.player.position(),
        camera_mode: camera.mode(),
        stats: state.stats.clone(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("blitz-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", blitz_kernel::crate_info());
            println!("render: {}", blitz_render::crate_info());
            println!("input: {}", blitz_input::crate_info());
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", config.to_yaml()?);
        }
        Commands::Run {
            frames,
            dt,
            config,
            script,
            json,
            trace_frames,
        } => {
            anyhow::ensure!(
                dt.is_finite() && dt > 0.0,
                "--dt must be a positive number of seconds"
            );
            let config = load_config(config.as_deref())?;
            tracing::info!(?script, frames, dt, "starting headless session");
            let summary = run_session(config, script, frames, dt, trace_frames);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Script {}: {} after {} frames ({:.1}s unpaused)",
                    summary.script, summary.outcome, summary.stats.frames, summary.stats.elapsed
                );
                println!(
                    "Phase {} (highest {}), kills={}, live zombies={}",
                    summary.phase,
                    summary.stats.highest_phase,
                    summary.stats.total_kills,
                    summary.live_zombies
                );
                let p = summary.player_position;
                println!(
                    "Player at ({:.2}, {:.2}, {:.2}), camera {:?}",
                    p.x, p.y, p.z, summary.camera_mode
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_session_ends_in_game_over() {
        let summary = run_session(GameConfig::default(), Script::Idle, 3000, 1.0 / 60.0, 0);
        assert_eq!(summary.outcome, "game over");
        assert_eq!(summary.stats.total_kills, 0);
        assert!(summary.stats.frames < 3000);
    }

    #[test]
    fn short_session_survives() {
        let summary = run_session(GameConfig::default(), Script::Strafe, 60, 1.0 / 60.0, 0);
        assert_eq!(summary.outcome, "survived");
        assert_eq!(summary.stats.frames, 60);
        assert_eq!(summary.live_zombies, 0);
    }

    #[test]
    fn summary_serializes_to_json() {
        let summary = run_session(GameConfig::default(), Script::Throw, 10, 1.0 / 60.0, 0);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["script"], "throw");
        assert_eq!(json["stats"]["frames"], 10);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(load_config(Some(&missing)).is_err());
    }
}
