// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message source trait for chat platform integrations.

use async_trait::async_trait;

use crate::error::MoodwireError;
use crate::traits::adapter::Adapter;
use crate::types::RawMessage;

/// Adapter for a stream of chat messages.
///
/// Sources deliver messages at unspecified, possibly bursty intervals, and
/// may fail transiently (the producer retries after a backoff) or fatally
/// (the pipeline drains and stops). A source must never yield the same
/// upstream message twice; deduplication is the source's responsibility.
#[async_trait]
pub trait MessageSource: Adapter {
    /// Establishes the connection to the chat platform and starts
    /// observing messages.
    async fn connect(&mut self) -> Result<(), MoodwireError>;

    /// Returns the next observed message, suspending until one arrives.
    ///
    /// Errors carry a `fatal` flag: transient errors are retry-safe, fatal
    /// errors mean the source is permanently gone.
    async fn next(&self) -> Result<RawMessage, MoodwireError>;
}
