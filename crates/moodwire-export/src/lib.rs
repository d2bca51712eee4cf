// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV export of final analysis results.
//!
//! Implements [`Persister`]: one row per analysis result, written in
//! message order regardless of the order workers finished in. Columns:
//! timestamp, author, message text, sentiment label, comma-joined entity
//! texts, summary text.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use moodwire_core::{
    Adapter, AdapterType, AnalysisResult, HealthStatus, Message, MoodwireError,
    Persister, PipelineSnapshot,
};

/// CSV persister writing to a configured path.
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Adapter for CsvExporter {
    fn name(&self) -> &str {
        "csv-export"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Persister
    }

    async fn health_check(&self) -> Result<HealthStatus, MoodwireError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => Ok(
                HealthStatus::Degraded(format!("output directory {} missing", parent.display())),
            ),
            _ => Ok(HealthStatus::Healthy),
        }
    }

    async fn shutdown(&self) -> Result<(), MoodwireError> {
        Ok(())
    }
}

impl Persister for CsvExporter {
    /// Writes one row per result, re-sorted by message id so the file
    /// reflects chat chronology even when a worker pool finished results
    /// out of order.
    fn flush(&self, snapshot: &PipelineSnapshot) -> Result<PathBuf, MoodwireError> {
        info!(path = %self.path.display(), results = snapshot.results.len(), "writing results CSV");

        let by_id: HashMap<u64, &Message> =
            snapshot.messages.iter().map(|m| (m.id, m)).collect();

        let mut results: Vec<&AnalysisResult> = snapshot.results.iter().collect();
        results.sort_by_key(|r| r.message_id);

        let mut writer = csv::Writer::from_path(&self.path).map_err(persistence)?;
        writer
            .write_record(["timestamp", "author", "message", "sentiment", "entities", "summary"])
            .map_err(persistence)?;

        for result in results {
            let Some(message) = by_id.get(&result.message_id) else {
                // A result without its message would be a pipeline bug;
                // skip the row rather than aborting the export.
                debug!(message_id = result.message_id, "result has no matching message, skipped");
                continue;
            };

            let sentiment = result
                .sentiment
                .as_ref()
                .map(|s| s.label.to_string())
                .unwrap_or_default();
            let entities = result
                .entities
                .iter()
                .map(|e| e.text.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let summary = result.summary.as_deref().unwrap_or_default();

            writer
                .write_record([
                    message.observed_at.as_str(),
                    message.author.as_str(),
                    message.text.as_str(),
                    sentiment.as_str(),
                    entities.as_str(),
                    summary,
                ])
                .map_err(persistence)?;
            debug!(
                message_id = result.message_id,
                author = message.author.as_str(),
                "result row written"
            );
        }

        writer.flush().map_err(persistence)?;
        info!(path = %self.path.display(), "results CSV written");
        Ok(self.path.clone())
    }
}

fn persistence<E: std::error::Error + Send + Sync + 'static>(e: E) -> MoodwireError {
    MoodwireError::Persistence {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodwire_core::{Entity, Sentiment, SentimentLabel};

    fn message(id: u64, text: &str, author: &str, ts: &str) -> Message {
        Message {
            id,
            text: text.to_string(),
            author: author.to_string(),
            observed_at: ts.to_string(),
        }
    }

    fn result(
        message_id: u64,
        label: Option<SentimentLabel>,
        entities: &[&str],
        summary: Option<&str>,
    ) -> AnalysisResult {
        AnalysisResult {
            message_id,
            sentiment: label.map(|label| Sentiment { label, score: 0.9 }),
            entities: entities
                .iter()
                .map(|t| Entity {
                    text: t.to_string(),
                    kind: "MISC".to_string(),
                })
                .collect(),
            summary: summary.map(str::to_string),
            analyzed_at: "ta".to_string(),
        }
    }

    fn export(snapshot: &PipelineSnapshot) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let exporter = CsvExporter::new(&path);
        let written = exporter.flush(snapshot).unwrap();
        assert_eq!(written, path);
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn rows_follow_message_order_even_when_results_do_not() {
        let snapshot = PipelineSnapshot {
            messages: vec![
                message(1, "first", "alice", "t1"),
                message(2, "second", "bob", "t2"),
            ],
            results: vec![
                result(2, Some(SentimentLabel::Negative), &[], Some("s2")),
                result(1, Some(SentimentLabel::Positive), &[], Some("s1")),
            ],
            ..Default::default()
        };

        let content = export(&snapshot);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "timestamp,author,message,sentiment,entities,summary"
        );
        assert!(lines[1].starts_with("t1,alice,first,POSITIVE"));
        assert!(lines[2].starts_with("t2,bob,second,NEGATIVE"));
    }

    #[test]
    fn entities_are_comma_joined() {
        let snapshot = PipelineSnapshot {
            messages: vec![message(1, "trip", "alice", "t1")],
            results: vec![result(
                1,
                Some(SentimentLabel::Positive),
                &["Paris", "Anna"],
                Some("s"),
            )],
            ..Default::default()
        };

        let content = export(&snapshot);
        assert!(content.contains("\"Paris, Anna\""));
    }

    #[test]
    fn partial_results_write_empty_cells() {
        let snapshot = PipelineSnapshot {
            messages: vec![message(1, "odd", "alice", "t1")],
            results: vec![result(1, None, &[], None)],
            ..Default::default()
        };

        let content = export(&snapshot);
        let row = content.lines().nth(1).unwrap();
        assert_eq!(row, "t1,alice,odd,,,");
    }

    #[test]
    fn messages_without_results_produce_no_rows() {
        let snapshot = PipelineSnapshot {
            messages: vec![
                message(1, "analyzed", "alice", "t1"),
                message(2, "failed", "bob", "t2"),
            ],
            results: vec![result(1, Some(SentimentLabel::Neutral), &[], Some("s"))],
            ..Default::default()
        };

        let content = export(&snapshot);
        assert_eq!(content.lines().count(), 2); // header + one row
    }

    #[test]
    fn unwritable_path_is_a_persistence_error() {
        let exporter = CsvExporter::new("/nonexistent-dir/results.csv");
        let err = exporter.flush(&PipelineSnapshot::default()).unwrap_err();
        assert!(matches!(err, MoodwireError::Persistence { .. }));
    }
}
