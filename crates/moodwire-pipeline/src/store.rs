// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single shared aggregate state: message log, result log, running
//! statistics, and error counters.
//!
//! All mutation goes through one write lock on one inner struct, so
//! `apply` is atomic from any reader's point of view: a snapshot can never
//! observe a histogram update without the corresponding result-log append,
//! or vice versa. Readers take a short read lock and clone; presenters
//! never contend with workers beyond that clone.

use moodwire_core::{
    AnalysisResult, AnalysisStageKind, Message, PipelineSnapshot, RawMessage,
};
use tokio::sync::RwLock;
use tracing::debug;

/// The shared aggregate store.
///
/// The only structure mutated by more than one actor: the producer appends
/// messages, N workers apply results and bump counters, presenters and the
/// persister read snapshots.
pub struct AggregateStore {
    inner: RwLock<Inner>,
}

struct Inner {
    messages: Vec<Message>,
    results: Vec<AnalysisResult>,
    sentiment: moodwire_core::SentimentHistogram,
    keywords: moodwire_core::KeywordFrequency,
    errors: moodwire_core::ErrorCounters,
    /// Next message id. Ids start at 1 and are assigned at admission, so a
    /// message is always present in the log before any result can refer to
    /// it.
    next_id: u64,
}

impl Default for AggregateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                messages: Vec::new(),
                results: Vec::new(),
                sentiment: moodwire_core::SentimentHistogram::default(),
                keywords: moodwire_core::KeywordFrequency::default(),
                errors: moodwire_core::ErrorCounters::default(),
                next_id: 1,
            }),
        }
    }

    /// Admits a raw source message: assigns the next monotonic id, appends
    /// to the message log, and returns the admitted [`Message`].
    pub async fn record_message(&self, raw: RawMessage) -> Message {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let msg = Message::admit(id, raw);
        inner.messages.push(msg.clone());
        debug!(message_id = id, author = msg.author.as_str(), "message admitted");
        msg
    }

    /// Applies one analysis result: appends to the result log and updates
    /// the sentiment histogram and keyword table in a single critical
    /// section.
    ///
    /// `result.message_id` must refer to a message previously returned by
    /// [`record_message`](Self::record_message); the pipeline guarantees
    /// this by construction (workers only ever see admitted messages).
    pub async fn apply(&self, result: AnalysisResult) {
        let mut inner = self.inner.write().await;
        inner.sentiment.record(result.sentiment.as_ref());
        for entity in &result.entities {
            inner.keywords.record(&entity.text);
        }
        inner.results.push(result);
    }

    /// Counts a transient source error the producer retried past.
    pub async fn record_source_error(&self) {
        self.inner.write().await.errors.source_errors += 1;
    }

    /// Counts one failed analysis sub-call.
    pub async fn record_stage_failure(&self, stage: AnalysisStageKind) {
        self.inner.write().await.errors.record_stage_failure(stage);
    }

    /// Counts a message that produced no result at all.
    pub async fn record_failed_message(&self) {
        self.inner.write().await.errors.failed_messages += 1;
    }

    /// Returns a consistent point-in-time copy of all aggregate structures.
    ///
    /// Calling this twice with no intervening mutation yields identical
    /// snapshots.
    pub async fn snapshot(&self) -> PipelineSnapshot {
        let inner = self.inner.read().await;
        PipelineSnapshot {
            messages: inner.messages.clone(),
            results: inner.results.clone(),
            sentiment: inner.sentiment.clone(),
            keywords: inner.keywords.clone(),
            errors: inner.errors,
        }
    }

    /// Messages admitted so far.
    pub async fn message_count(&self) -> usize {
        self.inner.read().await.messages.len()
    }

    /// Results applied so far.
    pub async fn result_count(&self) -> usize {
        self.inner.read().await.results.len()
    }
}
