// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sonaryx tests.
//!
//! Provides in-memory adapters for fast, deterministic, CI-runnable tests
//! without the Spotify API, Discord, or a database file.
//!
//! # Components
//!
//! - [`MockCatalog`] - Scripted catalog with per-artist failures and a gate
//! - [`MemoryStorage`] - In-memory subscriptions and snapshots
//! - [`MockChannel`] - Captures outbound messages for assertions
//! - [`fixtures`] - Release builders

pub mod fixtures;
pub mod memory_storage;
pub mod mock_catalog;
pub mod mock_channel;

pub use memory_storage::MemoryStorage;
pub use mock_catalog::MockCatalog;
pub use mock_channel::MockChannel;
