// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analysis worker: pulls admitted messages from the ingestion queue, runs
//! the three analysis sub-calls, and applies the merged result to the
//! aggregate store.
//!
//! The three sub-calls are independently failable. One flaky model must
//! never block all analytics: if summarization fails but sentiment and
//! entities succeed, the worker still emits a partial result with a null
//! summary. A message counts as fully failed only when all three sub-calls
//! fail or the message is malformed (empty text).

use std::sync::Arc;

use moodwire_core::{
    AnalysisResult, AnalysisStage, AnalysisStageKind, Message, MoodwireError,
};
use tracing::{debug, warn};

use crate::queue::IngestionQueue;
use crate::store::AggregateStore;

/// One member of the analysis worker pool. Any number of identical workers
/// may pull from the same queue; correctness does not depend on the count.
pub struct AnalysisWorker {
    id: usize,
    stage: Arc<dyn AnalysisStage>,
    store: Arc<AggregateStore>,
}

impl AnalysisWorker {
    pub fn new(id: usize, stage: Arc<dyn AnalysisStage>, store: Arc<AggregateStore>) -> Self {
        Self { id, stage, store }
    }

    /// Pulls from the queue until the closed-sentinel, applying each
    /// result (or counting the failure) as it completes.
    pub async fn run(self, queue: Arc<IngestionQueue>) {
        debug!(worker = self.id, "analysis worker started");
        while let Some(msg) = queue.dequeue().await {
            match self.process(&msg).await {
                Ok(result) => {
                    self.store.apply(result).await;
                }
                Err(e) => {
                    warn!(
                        worker = self.id,
                        message_id = msg.id,
                        error = %e,
                        "message produced no result"
                    );
                    self.store.record_failed_message().await;
                }
            }
        }
        debug!(worker = self.id, "queue drained, analysis worker exiting");
    }

    /// Analyzes one message.
    ///
    /// Runs sentiment, entity extraction, and summarization concurrently;
    /// each failure is logged and counted per stage without affecting the
    /// others. Returns `Err` only for a malformed message or when every
    /// sub-call failed.
    pub async fn process(&self, msg: &Message) -> Result<AnalysisResult, MoodwireError> {
        if msg.text.trim().is_empty() {
            return Err(MoodwireError::Internal(format!(
                "message {} is malformed: empty text",
                msg.id
            )));
        }

        let (sentiment, entities, summary) = tokio::join!(
            self.stage.sentiment(&msg.text),
            self.stage.entities(&msg.text),
            self.stage.summarize(&msg.text),
        );

        let sentiment = match sentiment {
            Ok(s) => Some(s),
            Err(e) => {
                self.note_stage_failure(msg, AnalysisStageKind::Sentiment, &e).await;
                None
            }
        };
        let (entities, entities_failed) = match entities {
            Ok(v) => (v, false),
            Err(e) => {
                self.note_stage_failure(msg, AnalysisStageKind::Entities, &e).await;
                (Vec::new(), true)
            }
        };
        let summary = match summary {
            Ok(s) => Some(s),
            Err(e) => {
                self.note_stage_failure(msg, AnalysisStageKind::Summary, &e).await;
                None
            }
        };

        if sentiment.is_none() && entities_failed && summary.is_none() {
            return Err(MoodwireError::Internal(format!(
                "all analysis stages failed for message {}",
                msg.id
            )));
        }

        Ok(AnalysisResult {
            message_id: msg.id,
            sentiment,
            entities,
            summary,
            analyzed_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    async fn note_stage_failure(
        &self,
        msg: &Message,
        stage: AnalysisStageKind,
        error: &MoodwireError,
    ) {
        warn!(
            worker = self.id,
            message_id = msg.id,
            stage = %stage,
            error = %error,
            "analysis sub-call failed"
        );
        self.store.record_stage_failure(stage).await;
    }
}
