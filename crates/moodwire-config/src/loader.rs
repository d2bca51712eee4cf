// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./moodwire.toml` > `~/.config/moodwire/moodwire.toml`
//! > `/etc/moodwire/moodwire.toml`, with environment variable overrides via
//! the `MOODWIRE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MoodwireConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/moodwire/moodwire.toml` (system-wide)
/// 3. `~/.config/moodwire/moodwire.toml` (user XDG config)
/// 4. `./moodwire.toml` (local directory)
/// 5. `MOODWIRE_*` environment variables
pub fn load_config() -> Result<MoodwireConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MoodwireConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MoodwireConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MoodwireConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MoodwireConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for
/// diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MoodwireConfig::default()))
        .merge(Toml::file("/etc/moodwire/moodwire.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("moodwire/moodwire.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("moodwire.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `MOODWIRE_DISCORD_CHANNEL_ID` must map
/// to `discord.channel_id`, not `discord.channel.id`.
fn env_provider() -> Env {
    Env::prefixed("MOODWIRE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: MOODWIRE_INFERENCE_API_TOKEN -> "inference_api_token"
        let mapped = key
            .as_str()
            .replacen("monitor_", "monitor.", 1)
            .replacen("queue_", "queue.", 1)
            .replacen("pipeline_", "pipeline.", 1)
            .replacen("inference_", "inference.", 1)
            .replacen("discord_", "discord.", 1)
            .replacen("presenter_", "presenter.", 1)
            .replacen("export_", "export.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodwire_core::OverflowPolicy;

    #[test]
    fn string_config_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [queue]
            capacity = 64
            policy = "drop-oldest"

            [pipeline]
            workers = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.queue.capacity, Some(64));
        assert_eq!(config.queue.policy, OverflowPolicy::DropOldest);
        assert_eq!(config.pipeline.workers, 4);
        // Untouched sections keep their defaults.
        assert_eq!(config.presenter.refresh_ms, 1000);
    }

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.monitor.name, "moodwire");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_config_from_str(
            r#"
            [monitor]
            naem = "oops"
            "#,
        );
        assert!(result.is_err());
    }
}
