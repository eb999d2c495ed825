//! Skill forge entry point.
//!
//! Run with: `skillforge <command>`. Content and generator tuning come from
//! `SKILL_DATA_DIR` (embedded content if unset); see [`CliConfig::from_env`].

use anyhow::Result;
use clap::Parser;
use skill_cli::commands::{Generate, Inspect, Simulate};
use skill_cli::config::CliConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Procedural skill generation tools
#[derive(Parser)]
#[command(name = "skillforge")]
#[command(about = "Generate, inspect and simulate assembled skills", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate skills from the template catalog
    Generate(Generate),

    /// List templates or compile one with default picks
    Inspect(Inspect),

    /// Run generated skills through a scripted arena
    Simulate(Simulate),
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let cli = Cli::parse();
    let config = CliConfig::from_env();

    match cli.command {
        Command::Generate(cmd) => cmd.execute(&config),
        Command::Inspect(cmd) => cmd.execute(&config),
        Command::Simulate(cmd) => cmd.execute(&config),
    }
}

/// Logs go to stderr so JSON output on stdout stays clean.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
