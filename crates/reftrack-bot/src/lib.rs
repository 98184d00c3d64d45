//! Reftrack Bot - referral tracking for a Telegram group
//!
//! Issues personal invite links, credits the link owner when someone joins
//! the target chat through one, and reverses the credit when that user
//! leaves.
//!
//! # Architecture
//!
//! - **Token**: the `ref_<owner>` link-name format, parsed in one place
//! - **Issuer**: personal invite links (best effort)
//! - **Reconciler**: membership transitions -> ledger mutations
//! - **Notifier**: congratulations to referrers (best effort)
//! - **Commands**: `/ping`, `/link`, `/myreferrals` in private chats
//! - **Admin Socket**: Unix socket for local operator commands (reftrack-admin CLI)
//!
//! # Example
//!
//! ```no_run
//! use reftrack_bot::{BotNode, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let node = BotNode::new(config)?;
//!     node.run().await?;
//!     Ok(())
//! }
//! ```

pub mod admin_socket;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod issuer;
pub mod membership;
pub mod node;
pub mod notifier;
pub mod platform;
pub mod reconciler;
pub mod replies;
pub mod token;

#[cfg(test)]
mod testing;

pub use config::{Config, ConfigError};
pub use context::AppContext;
pub use error::{Error, Result};
pub use membership::{ChatUser, MemberStatus, MembershipTransition, TransitionKind};
pub use node::BotNode;
pub use platform::{Platform, PlatformError, TelegramPlatform, TextMode};
pub use reconciler::{Outcome, SkipReason};
pub use token::{InviteToken, TokenError};
