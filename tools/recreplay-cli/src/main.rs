//! Recreplay CLI: record, replay and inspect interaction recordings.
//!
//! Usage:
//!   recreplay record --script <EVENTS>   Record a scripted session
//!   recreplay play <PATH>                Replay a recording on a headless surface
//!   recreplay info <PATH>                Show recording information
//!   recreplay validate <PATH>            Check a recording for problems

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use recreplay_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "recreplay",
    about = "Frame-based recording and replay of user interactions",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a session from a script of timed raw events
    Record {
        /// JSON-lines file of timed events
        #[arg(short, long)]
        script: PathBuf,

        /// Output file (defaults to a timestamped name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frames per second (overrides config)
        #[arg(long)]
        fps: Option<u32>,

        /// Comma-separated event classes to capture (overrides config)
        #[arg(long, value_delimiter = ',')]
        events: Vec<String>,

        /// Simulated display refresh rate
        #[arg(long, default_value = "60")]
        refresh_hz: u32,
    },

    /// Replay a recording on a headless surface
    Play {
        /// Path to the recording
        path: PathBuf,

        /// Pace playback with the wall clock instead of virtual time
        #[arg(long)]
        realtime: bool,

        /// Simulated display refresh rate
        #[arg(long, default_value = "60")]
        refresh_hz: u32,
    },

    /// Show recording information
    Info {
        /// Path to the recording
        path: PathBuf,
    },

    /// Check a recording for frames that would not replay
    Validate {
        /// Path to the recording
        path: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    recreplay_common::logging::init_logging(&config.logging)?;

    match cli.command {
        Commands::Record {
            script,
            output,
            fps,
            events,
            refresh_hz,
        } => commands::record::run(config, script, output, fps, events, refresh_hz),
        Commands::Play {
            path,
            realtime,
            refresh_hz,
        } => commands::play::run(config, path, realtime, refresh_hz).await,
        Commands::Info { path } => commands::info::run(path),
        Commands::Validate { path } => commands::validate::run(path),
    }
}
