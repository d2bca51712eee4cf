// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline tests over mock adapters.
//!
//! Each test runs a complete pipeline to Stopped via the harness (the mock
//! source fails fatally once drained, so runs end without signals) and
//! asserts on the final snapshot.

use moodwire_config::MoodwireConfig;
use moodwire_core::SentimentLabel;
use moodwire_test_utils::{raw_message, run_pipeline, run_pipeline_default, MockAnalysis, Outcome};

#[tokio::test]
async fn partial_failure_run_matches_expected_aggregates() {
    // One message analyzes cleanly, one fails every sub-call.
    let analysis = MockAnalysis::new();
    analysis.script("hi", Outcome::positive("hi"));
    analysis.script("bad", Outcome::total_failure());

    let snapshot = run_pipeline_default(
        vec![
            raw_message("hi", "alice", "t1"),
            raw_message("bad", "bob", "t2"),
        ],
        analysis,
    )
    .await;

    assert_eq!(snapshot.results.len(), 1);
    let result = &snapshot.results[0];
    assert_eq!(result.message_id, 1);
    assert_eq!(
        result.sentiment.as_ref().unwrap().label,
        SentimentLabel::Positive
    );
    assert!(result.entities.is_empty());
    assert_eq!(result.summary.as_deref(), Some("hi"));

    assert_eq!(snapshot.sentiment.count(SentimentLabel::Positive), 1);
    assert_eq!(snapshot.sentiment.total(), 1);
    assert_eq!(snapshot.errors.failed_messages, 1);
}

#[tokio::test]
async fn repeated_entity_across_results_accumulates() {
    let analysis = MockAnalysis::new();
    analysis.script(
        "trip one",
        Outcome::positive("s1").with_entity("Paris", "LOC"),
    );
    analysis.script(
        "trip two",
        Outcome::positive("s2").with_entity("Paris", "LOC"),
    );

    let snapshot = run_pipeline_default(
        vec![
            raw_message("trip one", "alice", "t1"),
            raw_message("trip two", "bob", "t2"),
        ],
        analysis,
    )
    .await;

    assert_eq!(snapshot.keywords.count("Paris"), 2);
    assert_eq!(snapshot.keywords.total_occurrences(), 2);
}

#[tokio::test]
async fn single_worker_results_are_a_subsequence_in_submission_order() {
    let analysis = MockAnalysis::new();
    analysis.script("m3", Outcome::total_failure());

    let messages = (1..=6)
        .map(|i| raw_message(&format!("m{i}"), "author", &format!("t{i}")))
        .collect();
    let snapshot = run_pipeline_default(messages, analysis).await;

    assert_eq!(snapshot.messages.len(), 6);
    assert!(snapshot.results.len() <= snapshot.messages.len());

    // With a single worker, results keep submission order and form a
    // subsequence of the message log.
    let result_ids: Vec<u64> = snapshot.results.iter().map(|r| r.message_id).collect();
    assert_eq!(result_ids, vec![1, 2, 4, 5, 6]);
}

#[tokio::test]
async fn histogram_total_tracks_result_log_for_partial_results() {
    let analysis = MockAnalysis::new();
    analysis.script("odd", Outcome::positive("s").fail_sentiment());

    let snapshot = run_pipeline_default(
        vec![
            raw_message("fine", "alice", "t1"),
            raw_message("odd", "bob", "t2"),
        ],
        analysis,
    )
    .await;

    assert_eq!(snapshot.results.len(), 2);
    assert_eq!(snapshot.sentiment.total(), 2);
    assert_eq!(snapshot.sentiment.unscored(), 1);
    assert_eq!(snapshot.errors.sentiment_failures, 1);
}

#[tokio::test]
async fn draining_reflects_every_admitted_message() {
    let analysis = MockAnalysis::new();
    analysis.script("drop me", Outcome::total_failure());

    let messages = vec![
        raw_message("keep 1", "a", "t1"),
        raw_message("drop me", "b", "t2"),
        raw_message("keep 2", "c", "t3"),
        raw_message("", "d", "t4"), // malformed: empty text
    ];
    let snapshot = run_pipeline_default(messages, analysis).await;

    // Every admitted message ends in the result log or the failed counter.
    assert_eq!(
        snapshot.messages.len() as u64,
        snapshot.results.len() as u64 + snapshot.errors.failed_messages
    );
    assert_eq!(snapshot.errors.failed_messages, 2);
}

#[tokio::test]
async fn worker_pool_processes_everything() {
    let mut config = MoodwireConfig::default();
    config.pipeline.workers = 4;

    let analysis = MockAnalysis::new();
    let messages = (1..=20)
        .map(|i| raw_message(&format!("msg {i}"), "author", &format!("t{i}")))
        .collect();
    let snapshot = run_pipeline(messages, analysis, config).await;

    assert_eq!(snapshot.results.len(), 20);
    assert_eq!(snapshot.sentiment.total(), 20);

    // Order may differ under concurrent workers, but every id appears
    // exactly once.
    let mut ids: Vec<u64> = snapshot.results.iter().map(|r| r.message_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=20).collect::<Vec<u64>>());
}

#[tokio::test]
async fn transient_source_errors_are_counted_and_retried() {
    let mut config = MoodwireConfig::default();
    config.pipeline.source_retry_ms = 1;

    let analysis = MockAnalysis::new();

    // Build the source by hand to interleave an error between messages.
    use moodwire_core::MoodwireError;
    use moodwire_pipeline::store::AggregateStore;
    use moodwire_pipeline::Pipeline;
    use moodwire_test_utils::{MockSource, NullPresenter};
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    let source = MockSource::drained_fatal();
    source.inject(raw_message("before", "alice", "t1")).await;
    source
        .inject_error(MoodwireError::transient_source("blip"))
        .await;
    source.inject(raw_message("after", "bob", "t2")).await;

    let store = Arc::new(AggregateStore::new());
    let pipeline = Pipeline::new(
        Box::new(source),
        Arc::new(analysis),
        Arc::new(NullPresenter::new()),
        store.clone(),
        &config,
    );
    pipeline.run(CancellationToken::new()).await.unwrap();

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.messages.len(), 2);
    assert_eq!(snapshot.results.len(), 2);
    assert_eq!(snapshot.errors.source_errors, 1);
}

#[tokio::test]
async fn snapshot_filter_is_read_only_presentation_state() {
    let analysis = MockAnalysis::new();
    let snapshot = run_pipeline_default(
        vec![
            raw_message("lunch plans", "alice", "t1"),
            raw_message("standup notes", "bob", "t2"),
        ],
        analysis,
    )
    .await;

    let filtered = snapshot.filter_messages("ALICE");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].text, "lunch plans");
    // Filtering does not alter the snapshot itself.
    assert_eq!(snapshot.messages.len(), 2);
}
