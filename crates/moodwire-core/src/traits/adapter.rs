// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait that all Moodwire adapters implement.

use async_trait::async_trait;

use crate::error::MoodwireError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Moodwire adapters.
///
/// Every adapter (source, analysis, presenter, persister) implements this
/// trait, which provides identity, health check, and shutdown capabilities.
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the role this adapter fills.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, MoodwireError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), MoodwireError>;
}
