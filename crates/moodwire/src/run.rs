// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `moodwire run` command implementation.
//!
//! Wires the configured adapters into the pipeline: Discord source, hosted
//! inference analysis stage, console presenter, and CSV exporter. Installs
//! signal handlers for graceful draining and flushes results exactly once
//! after the pipeline stops.

use std::sync::Arc;

use moodwire_config::MoodwireConfig;
use moodwire_console::ConsolePresenter;
use moodwire_core::{MoodwireError, Persister};
use moodwire_discord::DiscordSource;
use moodwire_export::CsvExporter;
use moodwire_inference::HostedAnalysisStage;
use moodwire_pipeline::shutdown;
use moodwire_pipeline::store::AggregateStore;
use moodwire_pipeline::Pipeline;
use tracing::{error, info, warn};

/// Runs the monitor until interrupted, then exports results.
pub async fn run_monitor(
    config: MoodwireConfig,
    filter: Option<String>,
) -> Result<(), MoodwireError> {
    init_tracing(&config.monitor.log_level);

    info!(monitor = config.monitor.name.as_str(), "starting moodwire");

    // Message source.
    let source = DiscordSource::new(config.discord.clone()).map_err(|e| {
        error!(error = %e, "failed to initialize Discord source");
        eprintln!(
            "error: Discord token and channel required. Set via: config, \
             MOODWIRE_DISCORD_TOKEN and MOODWIRE_DISCORD_CHANNEL_ID env vars"
        );
        e
    })?;

    // Analysis stage.
    let stage = HostedAnalysisStage::new(config.inference.clone()).map_err(|e| {
        error!(error = %e, "failed to initialize inference stage");
        e
    })?;
    if config.inference.api_token.is_none() {
        warn!("no inference API token configured; requests run on the rate-limited tier");
    }

    // Presenter.
    if let Some(ref query) = filter {
        info!(filter = query.as_str(), "presentation filter active");
    }
    let presenter = ConsolePresenter::new(
        filter,
        config.presenter.top_keywords,
        config.presenter.recent_messages,
    );

    // Shared state and pipeline.
    let store = Arc::new(AggregateStore::new());
    let exporter = CsvExporter::new(config.export.path.clone());
    let pipeline = Pipeline::new(
        Box::new(source),
        Arc::new(stage),
        Arc::new(presenter),
        store.clone(),
        &config,
    );

    // Install signal handler and run to Stopped.
    let cancel = shutdown::install_signal_handler();
    pipeline.run(cancel).await?;

    // Flush results exactly once. A persistence failure is a final
    // warning; the in-memory run was still complete.
    let snapshot = store.snapshot().await;
    match exporter.flush(&snapshot) {
        Ok(path) => {
            println!(
                "moodwire: {} results written to {}",
                snapshot.results.len(),
                path.display()
            );
        }
        Err(e) => {
            warn!(error = %e, "failed to write results CSV");
            eprintln!("warning: results were not persisted: {e}");
        }
    }

    info!("moodwire shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("moodwire={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
