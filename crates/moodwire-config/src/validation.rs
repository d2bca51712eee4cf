// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive intervals and consistent summary bounds.

use crate::diagnostic::ConfigError;
use crate::model::MoodwireConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MoodwireConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.pipeline.workers < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "pipeline.workers must be at least 1, got {}",
                config.pipeline.workers
            ),
        });
    }

    if let Some(capacity) = config.queue.capacity
        && capacity < 1
    {
        errors.push(ConfigError::Validation {
            message: "queue.capacity must be at least 1 when set".to_string(),
        });
    }

    if config.queue.high_water < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "queue.high_water must be at least 1, got {}",
                config.queue.high_water
            ),
        });
    }

    if config.presenter.refresh_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "presenter.refresh_ms must be greater than 0".to_string(),
        });
    }

    if config.presenter.top_keywords == 0 {
        errors.push(ConfigError::Validation {
            message: "presenter.top_keywords must be greater than 0".to_string(),
        });
    }

    if config.inference.summary_min_length >= config.inference.summary_max_length {
        errors.push(ConfigError::Validation {
            message: format!(
                "inference.summary_min_length ({}) must be less than inference.summary_max_length ({})",
                config.inference.summary_min_length, config.inference.summary_max_length
            ),
        });
    }

    if config.inference.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "inference.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.inference.endpoint.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "inference.endpoint must not be empty".to_string(),
        });
    }

    if config.discord.fetch_limit < 1 || config.discord.fetch_limit > 100 {
        errors.push(ConfigError::Validation {
            message: format!(
                "discord.fetch_limit must be between 1 and 100, got {}",
                config.discord.fetch_limit
            ),
        });
    }

    if config.discord.poll_interval_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "discord.poll_interval_ms must be greater than 0".to_string(),
        });
    }

    if config.export.path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "export.path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
