// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./sonaryx.toml` > `~/.config/sonaryx/sonaryx.toml` >
//! `/etc/sonaryx/sonaryx.toml`, with `SONARYX_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SonaryxConfig;

/// Config file locations, lowest precedence first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/sonaryx/sonaryx.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("sonaryx/sonaryx.toml"));
    }
    paths.push(PathBuf::from("sonaryx.toml"));
    paths
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<SonaryxConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SonaryxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SonaryxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SonaryxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SonaryxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used for standard loading, before extraction.
pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(SonaryxConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Environment provider mapping `SONARYX_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `SONARYX_SCHEDULE_DAILY_CRON` is `schedule.daily_cron`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("SONARYX_").map(|key| map_env_key(key.as_str()).into())
}

const SECTIONS: &[&str] = &["bot", "discord", "spotify", "storage", "schedule"];

/// Only the leading section name is split off, so `discord_bot_token`
/// becomes `discord.bot_token`.
fn map_env_key(key: &str) -> String {
    SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| format!("{section}.{rest}"))
        })
        .unwrap_or_else(|| key.to_string())
}
