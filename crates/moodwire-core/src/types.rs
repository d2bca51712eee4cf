// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Moodwire pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A chat message as delivered by a [`MessageSource`](crate::MessageSource),
/// before the pipeline has assigned it an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Message body.
    pub text: String,
    /// Display name of the author.
    pub author: String,
    /// Source-native timestamp string (RFC 3339 where the source provides it).
    pub timestamp: String,
    /// Upstream identifier (e.g. a Discord snowflake), used only for
    /// source-side deduplication. The pipeline never interprets it.
    #[serde(default)]
    pub source_id: Option<String>,
}

/// A chat message admitted to the pipeline. Immutable once created.
///
/// `id` is a monotonic sequence number assigned at admission; it is the
/// foreign key every [`AnalysisResult`] refers back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub author: String,
    pub observed_at: String,
}

impl Message {
    /// Builds a [`Message`] from a raw source message and an assigned id.
    pub fn admit(id: u64, raw: RawMessage) -> Self {
        Self {
            id,
            text: raw.text,
            author: raw.author,
            observed_at: raw.timestamp,
        }
    }
}

/// Sentiment class produced by the sentiment analysis stage.
///
/// Matches the hosted classifier's label set. Parsing is case-insensitive
/// (`"positive"`, `"POSITIVE"`); display is upper-case, which is also what
/// the CSV export writes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// A sentiment classification with model confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f32,
}

/// A named entity extracted from message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Literal entity text. Keyword counting is case-sensitive on this field.
    pub text: String,
    /// NER tag (e.g. `PER`, `ORG`, `LOC`).
    pub kind: String,
}

/// The analysis output for one [`Message`]. Created at most once per
/// message; immutable thereafter.
///
/// `sentiment` and `summary` are `None` when that sub-analysis failed
/// (partial result). `entities` is empty both when extraction found nothing
/// and when it failed; the failure shows up in the error counters instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub message_id: u64,
    pub sentiment: Option<Sentiment>,
    pub entities: Vec<Entity>,
    pub summary: Option<String>,
    pub analyzed_at: String,
}

/// The three independent sub-analyses a worker runs per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStageKind {
    Sentiment,
    Entities,
    Summary,
}

/// Overflow behavior for a bounded ingestion queue.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Suspend the producer until space frees (backpressure). The default:
    /// message loss is undesirable for an analytics tool.
    #[default]
    Block,
    /// Evict the oldest queued message to make room. Never errors.
    DropOldest,
    /// Fail the enqueue with `QueueFull`. The only policy that surfaces
    /// backpressure as an error to the producer.
    Reject,
}

/// States of the pipeline lifecycle.
///
/// `Idle -> Running -> Draining -> Stopped`, never skipping `Draining`:
/// abrupt termination would lose already-ingested, not-yet-analyzed messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    /// No workers started, queue empty.
    Idle,
    /// Source active, workers pulling, presenter polling.
    Running,
    /// Source stopped; workers finish what is already queued.
    Draining,
    /// Terminal. Results handed to the persister exactly once.
    Stopped,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "idle"),
            PipelineState::Running => write!(f, "running"),
            PipelineState::Draining => write!(f, "draining"),
            PipelineState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Identifies the role of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Source,
    Analysis,
    Presenter,
    Persister,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}
