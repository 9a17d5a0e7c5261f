// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Sonaryx release bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Sonaryx configuration.
///
/// Every section is optional and defaults to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SonaryxConfig {
    /// Bot identity and logging.
    #[serde(default)]
    pub bot: BotConfig,

    /// Discord delivery settings.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Spotify catalog credentials.
    #[serde(default)]
    pub spotify: SpotifyConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Daily and fallback check scheduling.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name used in logs.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "sonaryx".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Discord delivery configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscordConfig {
    /// Bot token. `None` disables delivery.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Numeric ID of the channel that receives reports.
    #[serde(default)]
    pub channel_id: Option<String>,

    /// User IDs pinged on reports with releases.
    #[serde(default)]
    pub mention_ids: Vec<String>,

    /// Plain-text mention line used when `mention_ids` is empty.
    #[serde(default)]
    pub mention_text: Option<String>,
}

/// Spotify Web API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SpotifyConfig {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    /// Market used when listing an artist's albums.
    #[serde(default = "default_market")]
    pub market: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            market: default_market(),
        }
    }
}

fn default_market() -> String {
    "US".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("sonaryx").join("sonaryx.db"))
        .and_then(|p| p.to_str().map(str::to_string))
        .unwrap_or_else(|| "sonaryx.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Release-check scheduling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Cron expression for the primary daily check.
    #[serde(default = "default_daily_cron")]
    pub daily_cron: String,

    /// Cron expression for the fallback check.
    #[serde(default = "default_fallback_cron")]
    pub fallback_cron: String,

    /// IANA timezone for both schedules and for "today".
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Look-back window in days. 0 reports today's releases only.
    #[serde(default)]
    pub release_window_days: u32,

    /// Run one primary check shortly after startup.
    #[serde(default)]
    pub run_on_start: bool,

    /// Delay before the startup run, in seconds.
    #[serde(default = "default_startup_delay_secs")]
    pub startup_delay_secs: u64,

    /// Pause between successive artist fetches, in milliseconds.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily_cron: default_daily_cron(),
            fallback_cron: default_fallback_cron(),
            timezone: default_timezone(),
            release_window_days: 0,
            run_on_start: false,
            startup_delay_secs: default_startup_delay_secs(),
            pacing_ms: default_pacing_ms(),
        }
    }
}

fn default_daily_cron() -> String {
    "0 9 * * *".to_string()
}

fn default_fallback_cron() -> String {
    "0 20 * * *".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_startup_delay_secs() -> u64 {
    5
}

fn default_pacing_ms() -> u64 {
    1000
}
