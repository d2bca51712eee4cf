// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Moodwire chat monitor.

use thiserror::Error;

use crate::types::AnalysisStageKind;

/// The primary error type used across all Moodwire adapter traits and
/// pipeline operations.
#[derive(Debug, Error)]
pub enum MoodwireError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Message source errors. `fatal: false` means the producer may retry
    /// after a backoff; `fatal: true` means the source is gone and the
    /// pipeline must begin draining.
    #[error("source error: {message}")]
    Source {
        message: String,
        fatal: bool,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single analysis sub-call failed (sentiment, entities, or summary).
    /// Isolated per stage; never aborts the worker.
    #[error("{stage} analysis error: {message}")]
    Analysis {
        stage: AnalysisStageKind,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The ingestion queue is at capacity under the `reject` overflow policy.
    #[error("ingestion queue full (capacity {capacity})")]
    QueueFull { capacity: usize },

    /// The ingestion queue has been closed; no new messages are accepted.
    #[error("ingestion queue closed")]
    QueueClosed,

    /// Result export failed. In-memory state is unaffected; reported to the
    /// operator as a final warning.
    #[error("persistence error: {source}")]
    Persistence {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MoodwireError {
    /// Shorthand for a retryable source error.
    pub fn transient_source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
            fatal: false,
            source: None,
        }
    }

    /// Shorthand for an unrecoverable source error.
    pub fn fatal_source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
            fatal: true,
            source: None,
        }
    }

    /// Shorthand for a per-stage analysis error.
    pub fn analysis(stage: AnalysisStageKind, message: impl Into<String>) -> Self {
        Self::Analysis {
            stage,
            message: message.into(),
            source: None,
        }
    }

    /// Returns `true` for a source error that must trigger draining.
    pub fn is_fatal_source(&self) -> bool {
        matches!(self, Self::Source { fatal: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_flag_is_carried() {
        assert!(MoodwireError::fatal_source("gone").is_fatal_source());
        assert!(!MoodwireError::transient_source("hiccup").is_fatal_source());
        assert!(!MoodwireError::QueueClosed.is_fatal_source());
    }

    #[test]
    fn analysis_error_names_its_stage() {
        let err = MoodwireError::analysis(AnalysisStageKind::Summary, "model timed out");
        assert_eq!(err.to_string(), "summary analysis error: model timed out");
    }

    #[test]
    fn queue_full_reports_capacity() {
        let err = MoodwireError::QueueFull { capacity: 64 };
        assert!(err.to_string().contains("64"));
    }
}
