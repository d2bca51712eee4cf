// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persister trait for final result export.

use std::path::PathBuf;

use crate::stats::PipelineSnapshot;
use crate::traits::adapter::Adapter;

/// Adapter for flushing final results to durable storage.
///
/// Invoked exactly once, after the pipeline reaches `Stopped`. Writes one
/// record per analysis result in message order (implementations re-sort by
/// message id, so out-of-order multi-worker result logs are safe to hand
/// over as-is).
pub trait Persister: Adapter {
    /// Writes the final results and returns the path written to.
    fn flush(&self, snapshot: &PipelineSnapshot) -> Result<PathBuf, crate::MoodwireError>;
}
