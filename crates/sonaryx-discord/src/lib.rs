// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord delivery channel for the Sonaryx release bot.
//!
//! Implements [`ChannelAdapter`] over Discord's REST API via serenity. The
//! bot only posts into one configured channel, so no gateway connection is
//! opened. Long messages are split on line boundaries, and pings are limited
//! to the user IDs carried by each message.

pub mod chunk;

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{ChannelId, CreateAllowedMentions, CreateMessage, Http, UserId};
use sonaryx_config::model::DiscordConfig;
use sonaryx_core::{
    AdapterType, ChannelAdapter, HealthStatus, MessageId, OutboundMessage, PluginAdapter,
    SonaryxError,
};
use tracing::{debug, info, warn};

use crate::chunk::{DISCORD_MAX_LEN, split_message};

/// Discord channel adapter implementing [`ChannelAdapter`].
pub struct DiscordChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
    connected: bool,
}

impl DiscordChannel {
    /// Creates a new Discord channel adapter.
    ///
    /// Requires `discord.bot_token` and a numeric `discord.channel_id`.
    pub fn new(config: &DiscordConfig) -> Result<Self, SonaryxError> {
        let token = config
            .bot_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                SonaryxError::Config("discord.bot_token is required for Discord delivery".into())
            })?;

        let channel_id = config
            .channel_id
            .as_deref()
            .ok_or_else(|| {
                SonaryxError::Config("discord.channel_id is required for Discord delivery".into())
            })
            .and_then(parse_channel_id)?;

        Ok(Self {
            http: Arc::new(Http::new(token)),
            channel_id,
            connected: false,
        })
    }

    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    fn channel_error(message: &str, e: serenity::Error) -> SonaryxError {
        SonaryxError::Channel {
            message: format!("{message}: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

fn parse_channel_id(raw: &str) -> Result<ChannelId, SonaryxError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(ChannelId::new)
        .ok_or_else(|| SonaryxError::Config(format!("discord.channel_id `{raw}` is not a valid id")))
}

/// User IDs allowed to be pinged. Non-numeric entries are dropped.
fn mention_users(ids: &[String]) -> Vec<UserId> {
    ids.iter()
        .filter_map(|id| id.parse::<u64>().ok())
        .filter(|id| *id != 0)
        .map(UserId::new)
        .collect()
}

#[async_trait]
impl PluginAdapter for DiscordChannel {
    fn name(&self) -> &str {
        "discord"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, SonaryxError> {
        match self.http.get_current_user().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), SonaryxError> {
        debug!("discord channel shut down");
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for DiscordChannel {
    /// Verifies the token by fetching the bot's own user.
    async fn connect(&mut self) -> Result<(), SonaryxError> {
        let me = self
            .http
            .get_current_user()
            .await
            .map_err(|e| Self::channel_error("Discord login failed", e))?;
        info!(bot = %me.name, channel = %self.channel_id, "Discord channel ready");
        self.connected = true;
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, SonaryxError> {
        if !self.connected {
            return Err(SonaryxError::channel("Discord channel is not connected"));
        }

        let users = mention_users(&msg.mention_ids);
        let chunks = split_message(&msg.text, DISCORD_MAX_LEN);
        if chunks.len() > 1 {
            debug!(chunks = chunks.len(), "splitting long message");
        }

        let mut last = None;
        for chunk in chunks {
            let builder = CreateMessage::new()
                .content(chunk)
                .allowed_mentions(CreateAllowedMentions::new().users(users.clone()));
            let sent = self
                .channel_id
                .send_message(self.http.as_ref(), builder)
                .await
                .map_err(|e| {
                    warn!(channel = %self.channel_id, error = %e, "Discord send failed");
                    Self::channel_error("failed to send Discord message", e)
                })?;
            last = Some(sent.id);
        }

        last.map(|id| MessageId(id.to_string()))
            .ok_or_else(|| SonaryxError::channel("refusing to send an empty message"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>, channel: Option<&str>) -> DiscordConfig {
        DiscordConfig {
            bot_token: token.map(str::to_string),
            channel_id: channel.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn token_is_required() {
        let err = DiscordChannel::new(&config(None, Some("123"))).err().unwrap();
        assert!(err.to_string().contains("discord.bot_token"));
        let err = DiscordChannel::new(&config(Some("  "), Some("123"))).err().unwrap();
        assert!(matches!(err, SonaryxError::Config(_)));
    }

    #[test]
    fn channel_id_must_be_numeric() {
        assert!(DiscordChannel::new(&config(Some("t"), None)).is_err());
        assert!(DiscordChannel::new(&config(Some("t"), Some("general"))).is_err());

        let channel = DiscordChannel::new(&config(Some("t"), Some("123456789012345678"))).unwrap();
        assert_eq!(channel.channel_id().get(), 123456789012345678);
    }

    #[test]
    fn mention_users_drop_invalid_ids() {
        let ids = vec!["111111".to_string(), "abc".to_string(), "0".to_string()];
        assert_eq!(mention_users(&ids), vec![UserId::new(111111)]);
    }

    #[tokio::test]
    async fn send_before_connect_fails() {
        let channel = DiscordChannel::new(&config(Some("t"), Some("123"))).unwrap();
        let err = channel.send(OutboundMessage::text("hi")).await.unwrap_err();
        assert!(matches!(err, SonaryxError::Channel { .. }));
    }
}
