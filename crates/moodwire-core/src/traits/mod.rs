// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for all swappable Moodwire collaborators.

pub mod adapter;
pub mod analysis;
pub mod persister;
pub mod presenter;
pub mod source;

pub use adapter::Adapter;
pub use analysis::AnalysisStage;
pub use persister::Persister;
pub use presenter::Presenter;
pub use source::MessageSource;
