//! Messaging platform seam.
//!
//! Everything the bot asks of Telegram goes through [`Platform`], so the
//! reconciler, issuer, notifier and commands can run against a fake in tests.

use std::future::Future;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::RequestError;
use thiserror::Error;

/// A failed platform call (rate limit, missing rights, blocked bot, network).
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("request failed: {0}")]
    Request(#[from] RequestError),
}

/// How message text is interpreted by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    Plain,
    Html,
}

/// Outbound platform operations.
pub trait Platform: Send + Sync + 'static {
    /// Create a named invite link to `chat_id`, returning its URL.
    fn create_invite_link(
        &self,
        chat_id: i64,
        name: String,
        creates_join_request: bool,
    ) -> impl Future<Output = Result<String, PlatformError>> + Send;

    /// Send `text` to a chat (a user id addresses their private chat).
    fn send_message(
        &self,
        chat_id: i64,
        text: String,
        mode: TextMode,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;

    /// Drop any registered webhook and its pending updates.
    fn delete_webhook(&self) -> impl Future<Output = Result<(), PlatformError>> + Send;
}

/// [`Platform`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

impl Platform for TelegramPlatform {
    async fn create_invite_link(
        &self,
        chat_id: i64,
        name: String,
        creates_join_request: bool,
    ) -> Result<String, PlatformError> {
        let link = self
            .bot
            .create_chat_invite_link(ChatId(chat_id))
            .name(name)
            .creates_join_request(creates_join_request)
            .await?;
        Ok(link.invite_link)
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: String,
        mode: TextMode,
    ) -> Result<(), PlatformError> {
        let request = self.bot.send_message(ChatId(chat_id), text);
        match mode {
            TextMode::Plain => request.await?,
            TextMode::Html => request.parse_mode(ParseMode::Html).await?,
        };
        Ok(())
    }

    async fn delete_webhook(&self) -> Result<(), PlatformError> {
        self.bot.delete_webhook().drop_pending_updates(true).await?;
        Ok(())
    }
}
