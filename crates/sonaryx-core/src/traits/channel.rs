// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for chat platforms (Discord, etc.).

use async_trait::async_trait;

use crate::error::SonaryxError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MessageId, OutboundMessage, ReleaseRef};

/// Outbound messaging sink for release alerts and run reports.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), SonaryxError>;

    /// Sends a message to the configured channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, SonaryxError>;

    /// Sends a single-release announcement.
    async fn send_release(&self, release: &ReleaseRef) -> Result<MessageId, SonaryxError> {
        self.send(OutboundMessage::text(format_release(release))).await
    }
}

/// Renders a release announcement.
pub fn format_release(release: &ReleaseRef) -> String {
    format!(
        "🎵 **Latest {}**: **{}** by **{}**\n📅 Released: {}\n🎧 Tracks: {}\n🔗 Listen: {}",
        release.album_type,
        release.name,
        release.artist_names(),
        release.release_date,
        release.total_tracks,
        release.external_link,
    )
}
