// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Release detection for the Sonaryx bot.
//!
//! - [`freshness`] classifies one release against an artist's history.
//! - [`runner`] walks the subscriptions and applies the classification.
//! - [`reconciler`] finds releases a previous day's pass did not record.
//! - [`report`] renders the chat messages for each pass.

pub mod freshness;
pub mod reconciler;
pub mod report;
pub mod runner;

pub use freshness::{Freshness, classify};
pub use reconciler::{FallbackReconciler, ReconcileOutcome};
pub use report::{Audience, RunKind};
pub use runner::{ArtistCheckRunner, Pacer, RunOutcome};
