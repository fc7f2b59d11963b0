use std::num::NonZeroU64;

use async_trait::async_trait;
use poise::serenity_prelude::{self as serenity, ChannelId, CreateMessage, Http};
use thiserror::Error;

use crate::config::Credentials;

/// Discord rejects messages longer than this many characters.
pub const MESSAGE_LIMIT: usize = 2000;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to deliver message to channel {channel}: {source}")]
    Delivery {
        channel: u64,
        #[source]
        source: serenity::Error,
    },
}

/// Sink for user-facing notifications. Implementations must never fail outward.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn notify(&self, message: &str);
}

pub struct DiscordNotifier {
    http: Http,
    channel: ChannelId,
}

impl DiscordNotifier {
    pub fn new(token: &str, channel_id: NonZeroU64) -> Self {
        Self {
            http: Http::new(token),
            channel: ChannelId::new(channel_id.get()),
        }
    }

    pub fn channel_id(&self) -> u64 {
        self.channel.get()
    }

    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self::new(&credentials.discord_token, credentials.channel_id)
    }

    pub async fn deliver(&self, message: &str) -> Result<(), NotifyError> {
        let msg = CreateMessage::new().content(clip(message, MESSAGE_LIMIT));

        self.channel
            .send_message(&self.http, msg)
            .await
            .map_err(|source| NotifyError::Delivery {
                channel: self.channel.get(),
                source,
            })?;

        Ok(())
    }
}

#[async_trait]
impl Notify for DiscordNotifier {
    async fn notify(&self, message: &str) {
        match self.deliver(message).await {
            Ok(()) => tracing::info!(%message, "Notification sent"),
            Err(e) => tracing::error!(error = %e, %message, "Notification was not delivered"),
        }
    }
}

/// Cuts `message` to at most `limit` characters without splitting one.
pub fn clip(message: &str, limit: usize) -> &str {
    match message.char_indices().nth(limit) {
        Some((end, _)) => &message[..end],
        None => message,
    }
}
