// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analysis stage trait for text-analysis model integrations.

use async_trait::async_trait;

use crate::error::MoodwireError;
use crate::traits::adapter::Adapter;
use crate::types::{Entity, Sentiment};

/// Adapter for the three text analyses run per message.
///
/// The three calls are independently invokable and independently failable;
/// a worker merges their outcomes (partial results are valid). Each call
/// may be slow — seconds of model latency is normal — so callers treat
/// these as the pipeline's dominant suspension points.
#[async_trait]
pub trait AnalysisStage: Adapter {
    /// Classifies the overall sentiment of `text`.
    async fn sentiment(&self, text: &str) -> Result<Sentiment, MoodwireError>;

    /// Extracts named entities from `text`, in occurrence order.
    async fn entities(&self, text: &str) -> Result<Vec<Entity>, MoodwireError>;

    /// Produces a short summary of `text`.
    async fn summarize(&self, text: &str) -> Result<String, MoodwireError>;
}
