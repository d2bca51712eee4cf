// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Moodwire chat monitor.
//!
//! This crate provides the foundational trait definitions, error types,
//! shared message/result types, and running-statistics structures used
//! throughout the Moodwire workspace. All adapter implementations
//! implement traits defined here.

pub mod error;
pub mod stats;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MoodwireError;
pub use stats::{ErrorCounters, KeywordFrequency, PipelineSnapshot, SentimentHistogram};
pub use types::{
    AdapterType, AnalysisResult, AnalysisStageKind, Entity, HealthStatus, Message,
    OverflowPolicy, PipelineState, RawMessage, Sentiment, SentimentLabel,
};

// Re-export all adapter traits at crate root.
pub use traits::{Adapter, AnalysisStage, MessageSource, Persister, Presenter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_has_all_variants() {
        let _config = MoodwireError::Config("test".into());
        let _source = MoodwireError::Source {
            message: "test".into(),
            fatal: false,
            source: None,
        };
        let _analysis = MoodwireError::Analysis {
            stage: AnalysisStageKind::Sentiment,
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _full = MoodwireError::QueueFull { capacity: 1 };
        let _closed = MoodwireError::QueueClosed;
        let _persistence = MoodwireError::Persistence {
            source: Box::new(std::io::Error::other("test")),
        };
        let _internal = MoodwireError::Internal("test".into());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Compile-time check that every adapter trait is reachable through
        // the public API.
        fn _assert_adapter<T: Adapter>() {}
        fn _assert_source<T: MessageSource>() {}
        fn _assert_analysis<T: AnalysisStage>() {}
        fn _assert_presenter<T: Presenter>() {}
        fn _assert_persister<T: Persister>() {}
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Source,
            AdapterType::Analysis,
            AdapterType::Presenter,
            AdapterType::Persister,
        ] {
            let s = variant.to_string();
            assert_eq!(AdapterType::from_str(&s).unwrap(), variant);
        }
    }
}
