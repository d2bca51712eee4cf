// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Moodwire integration tests.
//!
//! Provides mock implementations of the source and analysis adapters, a
//! no-op presenter, and an end-to-end pipeline harness. Everything here is
//! deterministic and CI-runnable: no network, no models, no signals.

pub mod harness;
pub mod mock_analysis;
pub mod mock_source;

pub use harness::{run_pipeline, run_pipeline_default, NullPresenter};
pub use mock_analysis::{MockAnalysis, Outcome};
pub use mock_source::{raw_message, MockSource};
