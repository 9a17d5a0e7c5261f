// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for subscription and snapshot storage.

pub mod artists;
pub mod daily_releases;
