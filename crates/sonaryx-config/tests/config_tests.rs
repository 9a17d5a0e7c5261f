// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Sonaryx configuration system.

use sonaryx_config::diagnostic::ConfigError;
use sonaryx_config::model::SonaryxConfig;
use sonaryx_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[bot]
name = "release-bot"
log_level = "debug"

[discord]
bot_token = "discord-token"
channel_id = "123456789012345678"
mention_ids = ["111111111111", "222222222222"]

[spotify]
client_id = "cid"
client_secret = "secret"
market = "KR"

[storage]
database_path = "/tmp/sonaryx-test.db"
wal_mode = false

[schedule]
daily_cron = "30 8 * * *"
fallback_cron = "0 21 * * *"
timezone = "Asia/Seoul"
release_window_days = 2
run_on_start = true
startup_delay_secs = 1
pacing_ms = 250
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should load");
    assert_eq!(config.bot.name, "release-bot");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.discord.bot_token.as_deref(), Some("discord-token"));
    assert_eq!(config.discord.mention_ids.len(), 2);
    assert_eq!(config.spotify.market, "KR");
    assert_eq!(config.storage.database_path, "/tmp/sonaryx-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.schedule.daily_cron, "30 8 * * *");
    assert_eq!(config.schedule.fallback_cron, "0 21 * * *");
    assert_eq!(config.schedule.timezone, "Asia/Seoul");
    assert_eq!(config.schedule.release_window_days, 2);
    assert!(config.schedule.run_on_start);
    assert_eq!(config.schedule.pacing_ms, 250);
}

/// Missing sections fall back to the documented defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.bot.name, "sonaryx");
    assert_eq!(config.bot.log_level, "info");
    assert!(config.discord.bot_token.is_none());
    assert!(config.discord.mention_ids.is_empty());
    assert!(config.spotify.client_id.is_none());
    assert_eq!(config.spotify.market, "US");
    assert!(config.storage.wal_mode);
    assert_eq!(config.schedule.daily_cron, "0 9 * * *");
    assert_eq!(config.schedule.fallback_cron, "0 20 * * *");
    assert_eq!(config.schedule.timezone, "UTC");
    assert_eq!(config.schedule.release_window_days, 0);
    assert!(!config.schedule.run_on_start);
    assert_eq!(config.schedule.startup_delay_secs, 5);
    assert_eq!(config.schedule.pacing_ms, 1000);
}

/// A typo in [schedule] is rejected with a suggestion.
#[test]
fn unknown_schedule_key_suggests_correction() {
    let toml = r#"
[schedule]
timezon = "UTC"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { suggestion, .. } => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("timezone"));
}

/// Wrong value types surface as InvalidType diagnostics.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[schedule]
release_window_days = "seven"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject string for u32");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "expected InvalidType, got {errors:?}"
    );
}

/// Semantic validation runs after deserialization.
#[test]
fn unknown_timezone_fails_validation() {
    let toml = r#"
[schedule]
timezone = "Atlantis/Capital"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject timezone");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

/// `SONARYX_*` variables override file values, including keys with underscores.
#[test]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "sonaryx.toml",
            r#"
[schedule]
daily_cron = "0 9 * * *"
"#,
        )?;
        jail.set_env("SONARYX_SCHEDULE_DAILY_CRON", "15 7 * * *");
        jail.set_env("SONARYX_DISCORD_BOT_TOKEN", "from-env");
        jail.set_env("SONARYX_SCHEDULE_RUN_ON_START", "true");

        let config = load_config_from_path(std::path::Path::new("sonaryx.toml"))?;
        assert_eq!(config.schedule.daily_cron, "15 7 * * *");
        assert_eq!(config.discord.bot_token.as_deref(), Some("from-env"));
        assert!(config.schedule.run_on_start);
        Ok(())
    });
}

/// Missing config files are skipped silently.
#[test]
fn missing_config_file_is_skipped() {
    let config = load_config_from_path(std::path::Path::new("/nonexistent/sonaryx.toml"))
        .expect("missing file should be skipped");
    assert_eq!(config.bot.name, SonaryxConfig::default().bot.name);
}
