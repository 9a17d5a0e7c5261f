// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sonaryx release bot.

use thiserror::Error;

/// The primary error type used across all Sonaryx adapter traits and core operations.
#[derive(Debug, Error)]
pub enum SonaryxError {
    /// Configuration errors (invalid TOML, unknown timezone, missing credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Catalog errors (HTTP failure, authentication, unexpected payload).
    #[error("catalog error: {message}")]
    Catalog {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The catalog has no artist matching the lookup.
    #[error("artist not found: {name}")]
    ArtistNotFound { name: String },

    /// Chat channel errors (delivery failure, unknown channel, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A release date that is not `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
    #[error("malformed release date `{value}`")]
    MalformedDate { value: String },

    /// A recurring schedule expression that could not be parsed.
    #[error("invalid schedule `{expression}`: {message}")]
    Schedule { expression: String, message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SonaryxError {
    /// Shorthand for a catalog error without an underlying source.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a channel error without an underlying source.
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
            source: None,
        }
    }

    /// Returns `true` for failures that concern a single artist fetch.
    ///
    /// Runners skip the artist and continue when this holds.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Catalog { .. } | Self::ArtistNotFound { .. })
    }
}
