// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Schedule expressions are not checked here. An unparseable
//! expression disables only its own trigger when the scheduler starts.

use sonaryx_core::DateWindow;

use crate::diagnostic::ConfigError;
use crate::model::SonaryxConfig;

/// Upper bound for the pause between artist fetches.
const MAX_PACING_MS: u64 = 60_000;

/// Upper bound for the release look-back window.
const MAX_WINDOW_DAYS: u32 = 365;

/// Validate a deserialized configuration, collecting every failure.
pub fn validate_config(config: &SonaryxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if DateWindow::from_name(config.schedule.timezone.trim()).is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "schedule.timezone `{}` is not a known IANA timezone",
                config.schedule.timezone
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.schedule.pacing_ms > MAX_PACING_MS {
        errors.push(ConfigError::Validation {
            message: format!(
                "schedule.pacing_ms must be at most {MAX_PACING_MS}, got {}",
                config.schedule.pacing_ms
            ),
        });
    }

    if config.schedule.release_window_days > MAX_WINDOW_DAYS {
        errors.push(ConfigError::Validation {
            message: format!(
                "schedule.release_window_days must be at most {MAX_WINDOW_DAYS}, got {}",
                config.schedule.release_window_days
            ),
        });
    }

    if let Some(channel_id) = &config.discord.channel_id {
        if channel_id.trim().parse::<u64>().is_err() {
            errors.push(ConfigError::Validation {
                message: format!("discord.channel_id `{channel_id}` must be a numeric ID"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
