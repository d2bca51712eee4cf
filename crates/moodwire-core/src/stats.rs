// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Running statistics structures and the snapshot view handed to presenters.
//!
//! All counters here are cumulative across the run: no decay, no windowing.
//! Updates are O(1) amortized; only [`KeywordFrequency::top_k`] sorts, and it
//! runs at presentation time, never per message.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::{AnalysisResult, AnalysisStageKind, Message, Sentiment, SentimentLabel};

/// Cumulative per-label sentiment counts.
///
/// The three standard labels are always present (zero-seeded) so the live
/// view renders a stable distribution from the first message on. Results
/// whose sentiment sub-call failed land in the `unscored` bucket, which
/// keeps the invariant `total() == result log length` intact even for
/// partial results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentHistogram {
    counts: BTreeMap<SentimentLabel, u64>,
    unscored: u64,
}

impl Default for SentimentHistogram {
    fn default() -> Self {
        let mut counts = BTreeMap::new();
        counts.insert(SentimentLabel::Positive, 0);
        counts.insert(SentimentLabel::Negative, 0);
        counts.insert(SentimentLabel::Neutral, 0);
        Self { counts, unscored: 0 }
    }
}

impl SentimentHistogram {
    /// Records the sentiment slot of one result. `None` counts as unscored.
    pub fn record(&mut self, sentiment: Option<&Sentiment>) {
        match sentiment {
            Some(s) => *self.counts.entry(s.label).or_insert(0) += 1,
            None => self.unscored += 1,
        }
    }

    /// Count for a single label.
    pub fn count(&self, label: SentimentLabel) -> u64 {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Results recorded without a sentiment classification.
    pub fn unscored(&self) -> u64 {
        self.unscored
    }

    /// Total results recorded, scored or not. Equals the result log length.
    pub fn total(&self) -> u64 {
        self.counts.values().sum::<u64>() + self.unscored
    }

    /// Iterates labels in stable (label) order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (SentimentLabel, u64)> + '_ {
        self.counts.iter().map(|(label, count)| (*label, *count))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct KeywordEntry {
    count: u64,
    /// Monotonic insertion index, used to break frequency ties so the live
    /// ranking is deterministic across snapshots.
    first_seen: u64,
}

/// Cumulative entity-text frequency table.
///
/// Counting is case-sensitive on the literal entity text, one increment per
/// occurrence per result (an entity repeated twice in one message counts
/// twice).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFrequency {
    entries: HashMap<String, KeywordEntry>,
    next_seen: u64,
}

impl KeywordFrequency {
    /// Records one entity occurrence.
    pub fn record(&mut self, text: &str) {
        if let Some(entry) = self.entries.get_mut(text) {
            entry.count += 1;
        } else {
            let first_seen = self.next_seen;
            self.next_seen += 1;
            self.entries
                .insert(text.to_string(), KeywordEntry { count: 1, first_seen });
        }
    }

    /// Occurrence count for one keyword.
    pub fn count(&self, text: &str) -> u64 {
        self.entries.get(text).map(|e| e.count).unwrap_or(0)
    }

    /// Sum of all occurrence counts.
    pub fn total_occurrences(&self) -> u64 {
        self.entries.values().map(|e| e.count).sum()
    }

    /// Number of distinct keywords seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `k` keywords by count, descending; ties broken by first-seen
    /// order. The only place this structure sorts.
    pub fn top_k(&self, k: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(&String, &KeywordEntry)> = self.entries.iter().collect();
        ranked.sort_by(|(_, a), (_, b)| {
            b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen))
        });
        ranked
            .into_iter()
            .take(k)
            .map(|(text, entry)| (text.clone(), entry.count))
            .collect()
    }
}

/// Error-count side effects of the pipeline. Failed analyses produce no
/// data-model entity; they only show up here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCounters {
    /// Transient source errors the producer retried past.
    pub source_errors: u64,
    /// Sentiment sub-call failures (message still produced a result).
    pub sentiment_failures: u64,
    /// Entity-extraction sub-call failures.
    pub entity_failures: u64,
    /// Summarization sub-call failures.
    pub summary_failures: u64,
    /// Messages that produced no result at all (all sub-calls failed, or
    /// the message was malformed).
    pub failed_messages: u64,
}

impl ErrorCounters {
    /// Bumps the counter for one failed sub-call.
    pub fn record_stage_failure(&mut self, stage: AnalysisStageKind) {
        match stage {
            AnalysisStageKind::Sentiment => self.sentiment_failures += 1,
            AnalysisStageKind::Entities => self.entity_failures += 1,
            AnalysisStageKind::Summary => self.summary_failures += 1,
        }
    }

    /// Sum of all counters.
    pub fn total(&self) -> u64 {
        self.source_errors
            + self.sentiment_failures
            + self.entity_failures
            + self.summary_failures
            + self.failed_messages
    }
}

/// A consistent point-in-time copy of the aggregate state, handed to
/// presenters and the persister. Owned data; reading it never contends
/// with the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    pub messages: Vec<Message>,
    pub results: Vec<AnalysisResult>,
    pub sentiment: SentimentHistogram,
    pub keywords: KeywordFrequency,
    pub errors: ErrorCounters,
}

impl PipelineSnapshot {
    /// Read-only presentation filter: case-insensitive substring match on
    /// message text or author. Never mutates the store.
    pub fn filter_messages(&self, query: &str) -> Vec<&Message> {
        let needle = query.to_lowercase();
        self.messages
            .iter()
            .filter(|m| {
                m.text.to_lowercase().contains(&needle)
                    || m.author.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entity;
    use proptest::prelude::*;

    fn scored(label: SentimentLabel) -> Option<Sentiment> {
        Some(Sentiment { label, score: 0.9 })
    }

    #[test]
    fn histogram_seeds_standard_labels() {
        let hist = SentimentHistogram::default();
        assert_eq!(hist.count(SentimentLabel::Positive), 0);
        assert_eq!(hist.count(SentimentLabel::Negative), 0);
        assert_eq!(hist.count(SentimentLabel::Neutral), 0);
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn histogram_counts_unscored_toward_total() {
        let mut hist = SentimentHistogram::default();
        hist.record(scored(SentimentLabel::Positive).as_ref());
        hist.record(None);
        assert_eq!(hist.count(SentimentLabel::Positive), 1);
        assert_eq!(hist.unscored(), 1);
        assert_eq!(hist.total(), 2);
    }

    proptest! {
        #[test]
        fn histogram_total_equals_records(records in prop::collection::vec(0u8..4, 0..64)) {
            let mut hist = SentimentHistogram::default();
            for r in &records {
                let sentiment = match r {
                    0 => scored(SentimentLabel::Positive),
                    1 => scored(SentimentLabel::Negative),
                    2 => scored(SentimentLabel::Neutral),
                    _ => None,
                };
                hist.record(sentiment.as_ref());
            }
            prop_assert_eq!(hist.total(), records.len() as u64);
        }
    }

    #[test]
    fn keyword_counting_is_case_sensitive() {
        let mut freq = KeywordFrequency::default();
        freq.record("Paris");
        freq.record("paris");
        freq.record("Paris");
        assert_eq!(freq.count("Paris"), 2);
        assert_eq!(freq.count("paris"), 1);
        assert_eq!(freq.total_occurrences(), 3);
    }

    #[test]
    fn top_k_breaks_ties_by_first_seen() {
        let mut freq = KeywordFrequency::default();
        freq.record("alpha");
        freq.record("beta");
        freq.record("gamma");
        freq.record("gamma");
        // alpha and beta both have count 1; alpha was seen first.
        let top = freq.top_k(3);
        assert_eq!(
            top,
            vec![
                ("gamma".to_string(), 2),
                ("alpha".to_string(), 1),
                ("beta".to_string(), 1),
            ]
        );
    }

    #[test]
    fn top_k_truncates() {
        let mut freq = KeywordFrequency::default();
        for word in ["a", "b", "c", "d"] {
            freq.record(word);
        }
        assert_eq!(freq.top_k(2).len(), 2);
    }

    #[test]
    fn error_counters_route_by_stage() {
        let mut errors = ErrorCounters::default();
        errors.record_stage_failure(AnalysisStageKind::Sentiment);
        errors.record_stage_failure(AnalysisStageKind::Summary);
        errors.record_stage_failure(AnalysisStageKind::Summary);
        assert_eq!(errors.sentiment_failures, 1);
        assert_eq!(errors.entity_failures, 0);
        assert_eq!(errors.summary_failures, 2);
        assert_eq!(errors.total(), 3);
    }

    #[test]
    fn filter_matches_text_and_author_case_insensitively() {
        let snapshot = PipelineSnapshot {
            messages: vec![
                Message {
                    id: 1,
                    text: "Lunch in Paris".into(),
                    author: "alice".into(),
                    observed_at: "t1".into(),
                },
                Message {
                    id: 2,
                    text: "hello".into(),
                    author: "Bob".into(),
                    observed_at: "t2".into(),
                },
            ],
            ..Default::default()
        };

        let by_text = snapshot.filter_messages("paris");
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].id, 1);

        let by_author = snapshot.filter_messages("BOB");
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].id, 2);

        assert!(snapshot.filter_messages("zzz").is_empty());
    }

    #[test]
    fn entity_repetition_counts_twice() {
        let mut freq = KeywordFrequency::default();
        let entities = vec![
            Entity { text: "Paris".into(), kind: "LOC".into() },
            Entity { text: "Paris".into(), kind: "LOC".into() },
        ];
        for e in &entities {
            freq.record(&e.text);
        }
        assert_eq!(freq.count("Paris"), 2);
    }
}
