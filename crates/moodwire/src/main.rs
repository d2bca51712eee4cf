// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Moodwire - a live chat sentiment monitor.
//!
//! This is the binary entry point: it parses the CLI, loads and validates
//! configuration, and hands off to the monitor runner.

mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use moodwire_config::MoodwireConfig;

/// Moodwire - a live chat sentiment monitor.
#[derive(Parser, Debug)]
#[command(name = "moodwire", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start monitoring: ingest, analyze, render live, export on exit.
    Run {
        /// Path to a specific config file (skips the XDG hierarchy).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Presentation filter: case-insensitive substring on message text
        /// or author. Read-only; analysis still covers every message.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Load and validate configuration, then exit.
    CheckConfig {
        /// Path to a specific config file (skips the XDG hierarchy).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config_or_exit(path: Option<&PathBuf>) -> MoodwireConfig {
    let loaded = match path {
        Some(p) => moodwire_config::load_and_validate_path(p),
        None => moodwire_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            moodwire_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run { config, filter }) => {
            let config = load_config_or_exit(config.as_ref());
            if let Err(e) = run::run_monitor(config, filter).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig { config }) => {
            let config = load_config_or_exit(config.as_ref());
            println!(
                "moodwire: configuration OK (monitor.name={}, workers={})",
                config.monitor.name, config.pipeline.workers
            );
        }
        None => {
            println!("moodwire: use --help for available commands");
        }
    }
}
