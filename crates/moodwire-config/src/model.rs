// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Moodwire chat monitor.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use moodwire_core::OverflowPolicy;
use serde::{Deserialize, Serialize};

/// Top-level Moodwire configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MoodwireConfig {
    /// Monitor identity and logging settings.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Ingestion queue capacity and overflow settings.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Worker pool and producer retry settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Hosted inference API settings.
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Discord message source settings.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Live view refresh settings.
    #[serde(default)]
    pub presenter: PresenterConfig,

    /// Final CSV export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Monitor identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Display name of this monitor instance.
    #[serde(default = "default_monitor_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            name: default_monitor_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_monitor_name() -> String {
    "moodwire".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Ingestion queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Maximum queued messages. `None` means unbounded (the default), with
    /// `high_water` warnings to flag an unthrottled source.
    #[serde(default)]
    pub capacity: Option<usize>,

    /// Behavior when a bounded queue is full.
    #[serde(default)]
    pub policy: OverflowPolicy,

    /// Queue depth at which an unbounded queue logs a warning.
    #[serde(default = "default_high_water")]
    pub high_water: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: None,
            policy: OverflowPolicy::default(),
            high_water: default_high_water(),
        }
    }
}

fn default_high_water() -> usize {
    1000
}

/// Worker pool and producer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Number of concurrent analysis workers. With more than one worker the
    /// result log may complete out of submission order; the CSV export
    /// re-sorts by message id.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Backoff before the producer retries after a transient source error.
    #[serde(default = "default_source_retry_ms")]
    pub source_retry_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            source_retry_ms: default_source_retry_ms(),
        }
    }
}

fn default_workers() -> usize {
    1
}

fn default_source_retry_ms() -> u64 {
    1000
}

/// Hosted inference API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    /// Base URL of the inference API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API token. `None` sends unauthenticated requests (rate-limited tier).
    #[serde(default)]
    pub api_token: Option<String>,

    /// Sentiment classification model id.
    #[serde(default = "default_sentiment_model")]
    pub sentiment_model: String,

    /// Named-entity recognition model id.
    #[serde(default = "default_entity_model")]
    pub entity_model: String,

    /// Summarization model id.
    #[serde(default = "default_summary_model")]
    pub summary_model: String,

    /// Upper token bound for generated summaries.
    #[serde(default = "default_summary_max_length")]
    pub summary_max_length: u32,

    /// Lower token bound for generated summaries.
    #[serde(default = "default_summary_min_length")]
    pub summary_min_length: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_token: None,
            sentiment_model: default_sentiment_model(),
            entity_model: default_entity_model(),
            summary_model: default_summary_model(),
            summary_max_length: default_summary_max_length(),
            summary_min_length: default_summary_min_length(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_sentiment_model() -> String {
    "cardiffnlp/twitter-roberta-base-sentiment-latest".to_string()
}

fn default_entity_model() -> String {
    "dbmdz/bert-large-cased-finetuned-conll03-english".to_string()
}

fn default_summary_model() -> String {
    "facebook/bart-large-cnn".to_string()
}

fn default_summary_max_length() -> u32 {
    50
}

fn default_summary_min_length() -> u32 {
    25
}

fn default_timeout_secs() -> u64 {
    30
}

/// Discord message source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscordConfig {
    /// Discord bot token. `None` disables the Discord source.
    #[serde(default)]
    pub token: Option<String>,

    /// Channel id to observe.
    #[serde(default)]
    pub channel_id: Option<String>,

    /// Interval between REST polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Messages fetched per poll (Discord caps this at 100).
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u8,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: None,
            channel_id: None,
            poll_interval_ms: default_poll_interval_ms(),
            fetch_limit: default_fetch_limit(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_fetch_limit() -> u8 {
    50
}

/// Live view configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PresenterConfig {
    /// Refresh interval for the live view.
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,

    /// How many top keywords to show.
    #[serde(default = "default_top_keywords")]
    pub top_keywords: usize,

    /// How many recent messages to show.
    #[serde(default = "default_recent_messages")]
    pub recent_messages: usize,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            refresh_ms: default_refresh_ms(),
            top_keywords: default_top_keywords(),
            recent_messages: default_recent_messages(),
        }
    }
}

fn default_refresh_ms() -> u64 {
    1000
}

fn default_top_keywords() -> usize {
    10
}

fn default_recent_messages() -> usize {
    10
}

/// Final CSV export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Output path for the results CSV.
    #[serde(default = "default_export_path")]
    pub path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: default_export_path(),
        }
    }
}

fn default_export_path() -> String {
    "results.csv".to_string()
}
