// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Sonaryx release bot.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! model via `tokio-rusqlite`, and typed operations for artist subscriptions
//! and per-day release snapshots.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
