// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent ingestion-analysis pipeline for the Moodwire chat monitor.
//!
//! The [`Pipeline`] is the central coordinator that:
//! - Pulls raw messages from a [`MessageSource`] and admits them to the
//!   shared [`AggregateStore`]
//! - Buffers admitted messages in the [`IngestionQueue`]
//! - Runs a pool of [`AnalysisWorker`]s against an [`AnalysisStage`]
//! - Polls snapshots to a [`Presenter`] on a fixed interval
//! - Walks the `Idle -> Running -> Draining -> Stopped` lifecycle on
//!   shutdown, draining everything already ingested before stopping

pub mod lifecycle;
pub mod queue;
pub mod shutdown;
pub mod store;
pub mod worker;

use std::sync::Arc;
use std::time::Duration;

use moodwire_config::MoodwireConfig;
use moodwire_core::{
    AnalysisStage, MessageSource, MoodwireError, PipelineState, Presenter,
};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;

use crate::lifecycle::StateCell;
use crate::queue::IngestionQueue;
use crate::store::AggregateStore;
use crate::worker::AnalysisWorker;

/// The pipeline coordinator.
///
/// One producer task, N worker tasks, and one presenter poller, wired
/// through the ingestion queue and the aggregate store. `run` consumes the
/// pipeline and returns once the lifecycle reaches `Stopped`; the caller
/// keeps its own [`Arc<AggregateStore>`] for the final snapshot and export.
pub struct Pipeline {
    source: Box<dyn MessageSource>,
    stage: Arc<dyn AnalysisStage>,
    presenter: Arc<dyn Presenter>,
    store: Arc<AggregateStore>,
    queue: Arc<IngestionQueue>,
    state: StateCell,
    workers: usize,
    source_retry: Duration,
    refresh: Duration,
}

impl Pipeline {
    /// Creates a pipeline from configured adapters and settings.
    pub fn new(
        source: Box<dyn MessageSource>,
        stage: Arc<dyn AnalysisStage>,
        presenter: Arc<dyn Presenter>,
        store: Arc<AggregateStore>,
        config: &MoodwireConfig,
    ) -> Self {
        let queue = Arc::new(IngestionQueue::new(
            config.queue.capacity,
            config.queue.policy,
            config.queue.high_water,
        ));
        Self {
            source,
            stage,
            presenter,
            store,
            queue,
            state: StateCell::new(),
            workers: config.pipeline.workers.max(1),
            source_retry: Duration::from_millis(config.pipeline.source_retry_ms),
            refresh: Duration::from_millis(config.presenter.refresh_ms),
        }
    }

    /// Returns a receiver observing lifecycle transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    /// Runs the pipeline until the cancellation token triggers (or the
    /// source fails fatally) and the resulting drain completes.
    ///
    /// Every message admitted before the drain began is reflected in
    /// either the result log or the failed-message counter by the time
    /// this returns.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<(), MoodwireError> {
        self.source.connect().await?;
        self.state.transition(PipelineState::Running)?;
        info!(workers = self.workers, "pipeline running");

        // Producer: source -> store admission -> queue.
        let producer = {
            let store = self.store.clone();
            let queue = self.queue.clone();
            let cancel = cancel.clone();
            let retry = self.source_retry;
            let source = self.source;
            tokio::spawn(produce(source, store, queue, cancel, retry))
        };

        // Worker pool.
        let mut workers = JoinSet::new();
        for id in 0..self.workers {
            let worker = AnalysisWorker::new(id, self.stage.clone(), self.store.clone());
            let queue = self.queue.clone();
            workers.spawn(worker.run(queue));
        }

        // Presenter poller.
        let poller = {
            let presenter = self.presenter.clone();
            let store = self.store.clone();
            let state_rx = self.state.subscribe();
            tokio::spawn(poll_presenter(presenter, store, state_rx, self.refresh))
        };

        // Intake ends on shutdown signal or fatal source error.
        if producer.await.is_err() {
            error!("producer task panicked");
        }
        self.state.transition(PipelineState::Draining)?;
        self.queue.close().await;
        info!(queued = self.queue.len().await, "draining ingestion queue");

        while workers.join_next().await.is_some() {}
        self.state.transition(PipelineState::Stopped)?;

        if poller.await.is_err() {
            error!("presenter poller task panicked");
        }

        info!(
            messages = self.store.message_count().await,
            results = self.store.result_count().await,
            "pipeline stopped"
        );
        Ok(())
    }
}

/// Producer loop: pulls from the source and admits to the pipeline until
/// cancelled or the source fails fatally. Transient source errors are
/// counted and retried after a backoff.
async fn produce(
    source: Box<dyn MessageSource>,
    store: Arc<AggregateStore>,
    queue: Arc<IngestionQueue>,
    cancel: CancellationToken,
    retry: Duration,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("shutdown signal received, stopping message intake");
                break;
            }
            next = source.next() => match next {
                Ok(raw) => {
                    let msg = store.record_message(raw).await;
                    match queue.enqueue(msg).await {
                        Ok(()) => {}
                        Err(MoodwireError::QueueFull { capacity }) => {
                            warn!(capacity, "ingestion queue full, message not queued");
                        }
                        Err(MoodwireError::QueueClosed) => break,
                        Err(e) => {
                            error!(error = %e, "unexpected enqueue failure");
                            break;
                        }
                    }
                }
                Err(e) if e.is_fatal_source() => {
                    error!(error = %e, "fatal source error, stopping message intake");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "transient source error, retrying after backoff");
                    store.record_source_error().await;
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(retry) => {}
                    }
                }
            }
        }
    }

    if let Err(e) = source.shutdown().await {
        warn!(error = %e, "source shutdown error");
    }
    debug!("producer exiting");
}

/// Presenter poller: renders a snapshot on every tick until the pipeline
/// stops, then renders one final frame reflecting the terminal state.
async fn poll_presenter(
    presenter: Arc<dyn Presenter>,
    store: Arc<AggregateStore>,
    mut state_rx: watch::Receiver<PipelineState>,
    refresh: Duration,
) {
    let state_view = state_rx.clone();
    let mut ticker = tokio::time::interval(refresh);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = store.snapshot().await;
                presenter.render(&snapshot, *state_view.borrow());
            }
            changed = state_rx.changed() => {
                if changed.is_err() || *state_rx.borrow() == PipelineState::Stopped {
                    break;
                }
            }
        }
    }

    let snapshot = store.snapshot().await;
    presenter.render(&snapshot, PipelineState::Stopped);
    debug!("presenter poller exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodwire_test_utils::{MockAnalysis, MockSource, NullPresenter};

    #[tokio::test]
    async fn immediate_cancel_still_walks_full_lifecycle() {
        let source = MockSource::new();
        let store = Arc::new(AggregateStore::new());
        let config = MoodwireConfig::default();
        let pipeline = Pipeline::new(
            Box::new(source),
            Arc::new(MockAnalysis::new()),
            Arc::new(NullPresenter::new()),
            store.clone(),
            &config,
        );
        let mut state_rx = pipeline.subscribe_state();

        let cancel = CancellationToken::new();
        cancel.cancel();
        pipeline.run(cancel).await.unwrap();

        assert_eq!(*state_rx.borrow_and_update(), PipelineState::Stopped);
        assert_eq!(store.message_count().await, 0);
    }
}
