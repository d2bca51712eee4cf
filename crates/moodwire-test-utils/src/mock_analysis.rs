// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock analysis stage for deterministic testing.
//!
//! `MockAnalysis` implements [`AnalysisStage`] with per-text scripted
//! outcomes, enabling fast, CI-runnable tests without model calls. Each of
//! the three sub-calls can be scripted to succeed or fail independently,
//! mirroring the partial-failure semantics workers must handle.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use moodwire_core::{
    Adapter, AdapterType, AnalysisStage, AnalysisStageKind, Entity, HealthStatus,
    MoodwireError, Sentiment, SentimentLabel,
};

/// Scripted result of analyzing one text. `None` slots mean "this sub-call
/// fails".
#[derive(Debug, Clone)]
pub struct Outcome {
    sentiment: Option<Sentiment>,
    entities: Option<Vec<Entity>>,
    summary: Option<String>,
}

impl Outcome {
    /// A fully successful outcome: positive sentiment, no entities, and
    /// the given summary text.
    pub fn positive(summary: &str) -> Self {
        Self {
            sentiment: Some(Sentiment {
                label: SentimentLabel::Positive,
                score: 0.95,
            }),
            entities: Some(Vec::new()),
            summary: Some(summary.to_string()),
        }
    }

    /// An outcome where every sub-call fails.
    pub fn total_failure() -> Self {
        Self {
            sentiment: None,
            entities: None,
            summary: None,
        }
    }

    /// Overrides the sentiment.
    pub fn with_sentiment(mut self, label: SentimentLabel, score: f32) -> Self {
        self.sentiment = Some(Sentiment { label, score });
        self
    }

    /// Appends an entity to the scripted extraction result.
    pub fn with_entity(mut self, text: &str, kind: &str) -> Self {
        self.entities.get_or_insert_with(Vec::new).push(Entity {
            text: text.to_string(),
            kind: kind.to_string(),
        });
        self
    }

    /// Makes the sentiment sub-call fail.
    pub fn fail_sentiment(mut self) -> Self {
        self.sentiment = None;
        self
    }

    /// Makes the entity-extraction sub-call fail.
    pub fn fail_entities(mut self) -> Self {
        self.entities = None;
        self
    }

    /// Makes the summarization sub-call fail.
    pub fn fail_summary(mut self) -> Self {
        self.summary = None;
        self
    }
}

/// A mock analysis stage returning scripted outcomes per message text.
///
/// Unscripted texts get a default fully-successful outcome (positive
/// sentiment, no entities, `"summary of <text>"`).
pub struct MockAnalysis {
    scripted: Mutex<HashMap<String, Outcome>>,
}

impl MockAnalysis {
    pub fn new() -> Self {
        Self {
            scripted: Mutex::new(HashMap::new()),
        }
    }

    /// Scripts the outcome for one exact message text.
    pub fn script(&self, text: &str, outcome: Outcome) {
        self.scripted
            .lock()
            .expect("mock script lock poisoned")
            .insert(text.to_string(), outcome);
    }

    fn outcome_for(&self, text: &str) -> Outcome {
        self.scripted
            .lock()
            .expect("mock script lock poisoned")
            .get(text)
            .cloned()
            .unwrap_or_else(|| Outcome::positive(&format!("summary of {text}")))
    }
}

impl Default for MockAnalysis {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MockAnalysis {
    fn name(&self) -> &str {
        "mock-analysis"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Analysis
    }

    async fn health_check(&self) -> Result<HealthStatus, MoodwireError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MoodwireError> {
        Ok(())
    }
}

#[async_trait]
impl AnalysisStage for MockAnalysis {
    async fn sentiment(&self, text: &str) -> Result<Sentiment, MoodwireError> {
        self.outcome_for(text).sentiment.ok_or_else(|| {
            MoodwireError::analysis(AnalysisStageKind::Sentiment, "scripted sentiment failure")
        })
    }

    async fn entities(&self, text: &str) -> Result<Vec<Entity>, MoodwireError> {
        self.outcome_for(text).entities.ok_or_else(|| {
            MoodwireError::analysis(AnalysisStageKind::Entities, "scripted entities failure")
        })
    }

    async fn summarize(&self, text: &str) -> Result<String, MoodwireError> {
        self.outcome_for(text).summary.ok_or_else(|| {
            MoodwireError::analysis(AnalysisStageKind::Summary, "scripted summary failure")
        })
    }
}
