//! Bot node - the application entry point.
//!
//! Architecture:
//! - Single process with one shared RocksDB ledger
//! - Telegram long polling through teloxide's dispatcher
//! - Unix admin socket for local operator commands (reftrack-admin CLI)

use crate::admin_socket::AdminSocket;
use crate::config::Config;
use crate::context::AppContext;
use crate::dispatch::{self, BotContext};
use crate::error::Result;
use crate::platform::{Platform, PlatformError, TelegramPlatform};
use reftrack_ledger::Ledger;
use std::sync::Arc;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;

/// A running referral bot.
pub struct BotNode {
    ctx: Arc<BotContext>,
}

impl BotNode {
    /// Open the ledger and prepare the platform client.
    pub fn new(config: Config) -> Result<Self> {
        let ledger = Arc::new(Ledger::open(&config.db_path)?);
        let platform = TelegramPlatform::new(Bot::new(config.bot_token.clone()));
        let ctx = Arc::new(AppContext::new(config, ledger, platform));
        Ok(Self { ctx })
    }

    /// Shared context (for tests and embedding).
    pub fn context(&self) -> Arc<BotContext> {
        Arc::clone(&self.ctx)
    }

    /// Run until ctrl-c.
    pub async fn run(self) -> Result<()> {
        let config = &self.ctx.config;
        let bot = self.ctx.platform.bot().clone();

        let me = bot.get_me().await.map_err(PlatformError::from)?;
        tracing::info!("Referral bot starting");
        tracing::info!("  Bot: @{}", me.username());
        tracing::info!("  Channel: {}", config.channel_id);
        tracing::info!("  Ledger: {:?}", config.db_path);
        tracing::info!("  Admin: {:?}", config.admin_socket);

        // Polling only receives updates once no webhook is registered
        if let Err(e) = self.ctx.platform.delete_webhook().await {
            tracing::warn!("Failed to delete webhook: {}", e);
        }

        let admin_socket = AdminSocket::new(Arc::clone(&self.ctx.ledger), &config.admin_socket);
        tokio::spawn(async move {
            if let Err(e) = admin_socket.run().await {
                tracing::error!("Admin socket error: {}", e);
            }
        });

        Dispatcher::builder(bot, dispatch::schema::<TelegramPlatform>())
            .dependencies(dptree::deps![Arc::clone(&self.ctx)])
            .default_handler(|_| async {})
            .error_handler(LoggingErrorHandler::with_custom_text(
                "Error while handling update",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        tracing::info!("Referral bot stopped");
        Ok(())
    }
}
