// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console live-view presenter for the Moodwire chat monitor.
//!
//! Implements [`Presenter`] by printing a fixed-layout view on every poll:
//! recent messages (optionally filtered), the sentiment distribution, the
//! top keywords, and the error counters. Read-only against the snapshot;
//! an empty or unchanged snapshot renders the same layout with empty
//! sections.

use std::io::IsTerminal;

use async_trait::async_trait;
use colored::Colorize;

use moodwire_core::{
    Adapter, AdapterType, ErrorCounters, HealthStatus, Message, MoodwireError,
    PipelineSnapshot, PipelineState, Presenter, SentimentHistogram, SentimentLabel,
};

/// Console presenter with an optional read-only message filter.
pub struct ConsolePresenter {
    /// Case-insensitive substring filter on message text or author.
    filter: Option<String>,
    top_keywords: usize,
    recent_messages: usize,
    use_color: bool,
}

impl ConsolePresenter {
    pub fn new(filter: Option<String>, top_keywords: usize, recent_messages: usize) -> Self {
        Self {
            filter,
            top_keywords,
            recent_messages,
            use_color: std::io::stdout().is_terminal(),
        }
    }

    /// Disables ANSI colors regardless of terminal detection.
    pub fn plain(mut self) -> Self {
        self.use_color = false;
        self
    }
}

#[async_trait]
impl Adapter for ConsolePresenter {
    fn name(&self) -> &str {
        "console"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Presenter
    }

    async fn health_check(&self) -> Result<HealthStatus, MoodwireError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MoodwireError> {
        Ok(())
    }
}

impl Presenter for ConsolePresenter {
    fn render(&self, snapshot: &PipelineSnapshot, state: PipelineState) {
        let recent: Vec<&Message> = match self.filter.as_deref() {
            Some(query) => snapshot.filter_messages(query),
            None => snapshot.messages.iter().collect(),
        };
        let shown = recent.len().saturating_sub(self.recent_messages);

        println!();
        println!(
            "  moodwire [{}]  messages: {}  results: {}",
            state,
            snapshot.messages.len(),
            snapshot.results.len()
        );
        println!("  {}", "-".repeat(60));

        if let Some(query) = self.filter.as_deref() {
            println!("  filter: \"{query}\" ({} matching)", recent.len());
        }
        for message in &recent[shown..] {
            println!("  {}", format_message_line(message));
        }

        println!();
        println!("  sentiment");
        for line in sentiment_lines(&snapshot.sentiment) {
            if self.use_color {
                println!("    {}", colorize_sentiment_line(&line));
            } else {
                println!("    {line}");
            }
        }

        println!();
        println!("  top keywords");
        let top = snapshot.keywords.top_k(self.top_keywords);
        if top.is_empty() {
            println!("    (none yet)");
        }
        for line in keyword_lines(&top) {
            println!("    {line}");
        }

        println!();
        println!("  {}", format_error_line(&snapshot.errors));
        println!();
    }
}

/// `[timestamp] author: text`, the chat-log line format.
fn format_message_line(message: &Message) -> String {
    format!(
        "[{}] {}: {}",
        message.observed_at, message.author, message.text
    )
}

/// One line per label plus the unscored bucket when non-zero.
fn sentiment_lines(histogram: &SentimentHistogram) -> Vec<String> {
    let total = histogram.total().max(1);
    let mut lines: Vec<String> = histogram
        .iter()
        .map(|(label, count)| {
            let pct = count * 100 / total;
            format!("{label:<9} {count:>6}  {pct:>3}%")
        })
        .collect();
    if histogram.unscored() > 0 {
        let count = histogram.unscored();
        let pct = count * 100 / total;
        lines.push(format!("{:<9} {count:>6}  {pct:>3}%", "UNSCORED"));
    }
    lines
}

fn colorize_sentiment_line(line: &str) -> String {
    if line.starts_with(&SentimentLabel::Positive.to_string()) {
        line.green().to_string()
    } else if line.starts_with(&SentimentLabel::Negative.to_string()) {
        line.red().to_string()
    } else if line.starts_with(&SentimentLabel::Neutral.to_string()) {
        line.yellow().to_string()
    } else {
        line.dimmed().to_string()
    }
}

/// `keyword  count` lines, already ranked by [`KeywordFrequency::top_k`].
fn keyword_lines(top: &[(String, u64)]) -> Vec<String> {
    top.iter()
        .map(|(text, count)| format!("{text:<24} {count:>6}"))
        .collect()
}

fn format_error_line(errors: &ErrorCounters) -> String {
    format!(
        "errors: source {} | sentiment {} | entities {} | summary {} | failed messages {}",
        errors.source_errors,
        errors.sentiment_failures,
        errors.entity_failures,
        errors.summary_failures,
        errors.failed_messages
    )
}
