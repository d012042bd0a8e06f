use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

const SMOKE_SCRIPTS: [&str; 3] = ["idle", "strafe", "throw"];

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for boomerang blitz")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand, Clone, Copy)]
enum Task {
    /// fmt, clippy, tests and docs in one go
    Check,
    /// cargo fmt --check over the workspace
    Fmt,
    /// clippy with warnings denied
    Clippy,
    /// Unit tests for every crate
    Test,
    /// Simulation step timing bench
    Bench,
    /// rustdoc without dependencies
    Doc,
    /// Build every member
    Build,
    /// Play each scripted headless session through the CLI
    Smoke {
        /// Frames per scripted session
        #[arg(short, long, default_value = "600")]
        frames: u64,
    },
}

/// One cargo invocation with a banner.
struct Step {
    label: String,
    args: Vec<String>,
}

impl Step {
    fn new(label: impl Into<String>, args: &[&str]) -> Self {
        Self {
            label: label.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn run(&self) -> Result<()> {
        println!("==> {}", self.label);
        let status = Command::new("cargo").args(&self.args).status()?;
        if !status.success() {
            anyhow::bail!("{} failed ({status})", self.label);
        }
        Ok(())
    }
}

fn plan(task: Task) -> Vec<Step> {
    match task {
        Task::Check => [Task::Fmt, Task::Clippy, Task::Test, Task::Doc]
            .into_iter()
            .flat_map(plan)
            .collect(),
        Task::Fmt => vec![Step::new("fmt check", &["fmt", "--all", "--", "--check"])],
        Task::Clippy => vec![Step::new(
            "clippy",
            &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        )],
        Task::Test => vec![Step::new("tests", &["test", "--workspace"])],
        Task::Bench => vec![Step::new(
            "simulation bench",
            &["bench", "-p", "blitz-kernel", "--bench", "bench_simulation_step"],
        )],
        Task::Doc => vec![Step::new("docs", &["doc", "--workspace", "--no-deps"])],
        Task::Build => vec![Step::new("build", &["build", "--workspace"])],
        Task::Smoke { frames } => {
            let frames = frames.to_string();
            SMOKE_SCRIPTS
                .iter()
                .map(|&script| {
                    Step::new(
                        format!("smoke session: {script}"),
                        &[
                            "run",
                            "-q",
                            "-p",
                            "blitz-cli",
                            "--",
                            "run",
                            "--script",
                            script,
                            "--frames",
                            frames.as_str(),
                            "--json",
                        ],
                    )
                })
                .collect()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    for step in plan(cli.task) {
        step.run()?;
    }
    Ok(())
}
