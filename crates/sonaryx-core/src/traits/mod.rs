// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the collaborators around the release checks.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod catalog;
pub mod channel;
pub mod storage;

pub use adapter::PluginAdapter;
pub use catalog::CatalogAdapter;
pub use channel::ChannelAdapter;
pub use storage::StorageAdapter;
