// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Presenter trait for live-view rendering.

use crate::stats::PipelineSnapshot;
use crate::traits::adapter::Adapter;
use crate::types::PipelineState;

/// Adapter for the live presentation layer.
///
/// Called on a fixed poll interval with an owned snapshot. `render` is
/// read-only, must complete in bounded time independent of pipeline load,
/// and must tolerate an empty or unchanged snapshot.
pub trait Presenter: Adapter {
    /// Renders one snapshot of the aggregate state.
    fn render(&self, snapshot: &PipelineSnapshot, state: PipelineState);
}
