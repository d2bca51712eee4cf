// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message source for deterministic testing.
//!
//! `MockSource` implements [`MessageSource`] with injectable messages and
//! errors. By default `next()` suspends when the injection queue is empty
//! (so cancellation paths can be tested); `drained_fatal()` builds a source
//! that fails fatally once drained, which ends a pipeline run
//! deterministically without a signal.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use moodwire_core::{
    Adapter, AdapterType, HealthStatus, MessageSource, MoodwireError, RawMessage,
};

enum WhenEmpty {
    /// Suspend until something is injected.
    Wait,
    /// Return a fatal source error.
    Fatal,
}

/// A mock chat message source.
pub struct MockSource {
    queue: Arc<Mutex<VecDeque<Result<RawMessage, MoodwireError>>>>,
    notify: Arc<Notify>,
    when_empty: WhenEmpty,
}

impl MockSource {
    /// Creates a source whose `next()` waits while empty.
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            notify: Arc::new(Notify::new()),
            when_empty: WhenEmpty::Wait,
        }
    }

    /// Creates a source that fails fatally once everything injected has
    /// been consumed.
    pub fn drained_fatal() -> Self {
        Self {
            when_empty: WhenEmpty::Fatal,
            ..Self::new()
        }
    }

    /// Injects a message to be returned by a later `next()` call.
    pub async fn inject(&self, raw: RawMessage) {
        self.queue.lock().await.push_back(Ok(raw));
        self.notify.notify_one();
    }

    /// Injects an error to be returned by a later `next()` call.
    pub async fn inject_error(&self, error: MoodwireError) {
        self.queue.lock().await.push_back(Err(error));
        self.notify.notify_one();
    }

    /// Convenience: injects a message built from text/author/timestamp.
    pub async fn inject_text(&self, text: &str, author: &str, timestamp: &str) {
        self.inject(raw_message(text, author, timestamp)).await;
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a [`RawMessage`] for tests.
pub fn raw_message(text: &str, author: &str, timestamp: &str) -> RawMessage {
    RawMessage {
        text: text.to_string(),
        author: author.to_string(),
        timestamp: timestamp.to_string(),
        source_id: None,
    }
}

#[async_trait]
impl Adapter for MockSource {
    fn name(&self) -> &str {
        "mock-source"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }

    async fn health_check(&self) -> Result<HealthStatus, MoodwireError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MoodwireError> {
        Ok(())
    }
}

#[async_trait]
impl MessageSource for MockSource {
    async fn connect(&mut self) -> Result<(), MoodwireError> {
        Ok(())
    }

    async fn next(&self) -> Result<RawMessage, MoodwireError> {
        loop {
            {
                let mut queue = self.queue.lock().await;
                if let Some(item) = queue.pop_front() {
                    return item;
                }
            }
            match self.when_empty {
                WhenEmpty::Fatal => {
                    return Err(MoodwireError::fatal_source("mock source drained"));
                }
                WhenEmpty::Wait => self.notify.notified().await,
            }
        }
    }
}
