// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Sonaryx release bot.
//!
//! TOML files plus `SONARYX_*` environment overrides, strict key checking
//! (`deny_unknown_fields`), semantic validation, and miette diagnostics with
//! typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use sonaryx_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("daily schedule: {}", config.schedule.daily_cron);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::SonaryxConfig;

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<SonaryxConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<SonaryxConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path))
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<SonaryxConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<SonaryxConfig, figment::Error>,
) -> Result<SonaryxConfig, Vec<ConfigError>> {
    let config = loaded.map_err(diagnostic::figment_to_config_errors)?;
    validation::validate_config(&config)?;
    Ok(config)
}
