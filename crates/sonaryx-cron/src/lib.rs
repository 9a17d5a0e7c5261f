// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduling for the Sonaryx release bot.
//!
//! [`CheckScheduler`] runs the primary daily check and the fallback
//! reconciliation on their own cron expressions, evaluated in the
//! configured timezone. The passes themselves live in [`jobs`].

pub mod jobs;
pub mod schedule;
pub mod scheduler;

pub use jobs::{CheckSummary, ReleaseJobs};
pub use schedule::Schedule;
pub use scheduler::{CheckScheduler, Fire};
