// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline harness for integration tests.
//!
//! Builds a full pipeline over mock adapters, preloads the source, runs it
//! to completion (the mock source fails fatally once drained, which walks
//! the pipeline through Draining to Stopped without a signal), and returns
//! the final snapshot.

use std::sync::Arc;

use moodwire_config::MoodwireConfig;
use moodwire_core::{Adapter, AdapterType, HealthStatus, MoodwireError, PipelineSnapshot,
    PipelineState, Presenter, RawMessage};
use moodwire_pipeline::store::AggregateStore;
use moodwire_pipeline::Pipeline;
use tokio_util::sync::CancellationToken;

use crate::mock_analysis::MockAnalysis;
use crate::mock_source::MockSource;

/// A presenter that renders nothing. Pipeline tests only care about the
/// aggregate state.
pub struct NullPresenter;

impl NullPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullPresenter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Adapter for NullPresenter {
    fn name(&self) -> &str {
        "null-presenter"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Presenter
    }

    async fn health_check(&self) -> Result<HealthStatus, MoodwireError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MoodwireError> {
        Ok(())
    }
}

impl Presenter for NullPresenter {
    fn render(&self, _snapshot: &PipelineSnapshot, _state: PipelineState) {}
}

/// Runs a full pipeline over `messages` with the given scripted analysis
/// and configuration, returning the final snapshot.
pub async fn run_pipeline(
    messages: Vec<RawMessage>,
    analysis: MockAnalysis,
    config: MoodwireConfig,
) -> PipelineSnapshot {
    let source = MockSource::drained_fatal();
    for raw in messages {
        source.inject(raw).await;
    }

    let store = Arc::new(AggregateStore::new());
    let pipeline = Pipeline::new(
        Box::new(source),
        Arc::new(analysis),
        Arc::new(NullPresenter::new()),
        store.clone(),
        &config,
    );

    pipeline
        .run(CancellationToken::new())
        .await
        .expect("pipeline run failed");

    store.snapshot().await
}

/// [`run_pipeline`] with the default configuration (single worker).
pub async fn run_pipeline_default(
    messages: Vec<RawMessage>,
    analysis: MockAnalysis,
) -> PipelineSnapshot {
    run_pipeline(messages, analysis, MoodwireConfig::default()).await
}
