//! Bot configuration from environment variables.

use reftrack_ledger::UserId;
use std::path::PathBuf;
use thiserror::Error;

/// Default ledger location.
pub const DEFAULT_DB_PATH: &str = "referrals.db";

/// Default operator socket location.
pub const DEFAULT_ADMIN_SOCKET: &str = "reftrack-admin.sock";

/// Problems found while reading configuration. All of them are fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required key is unset or blank
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A key is set but cannot be parsed
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Configuration for the referral bot.
#[derive(Clone)]
pub struct Config {
    /// Platform credential
    pub bot_token: String,

    /// The group/channel whose membership is tracked and invited to
    pub channel_id: i64,

    /// Reserved for operator authorization; parsed but not consulted yet
    pub admin_ids: Vec<UserId>,

    /// Ledger directory
    pub db_path: PathBuf,

    /// Operator socket path
    pub admin_socket: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("admin_ids", &self.admin_ids)
            .field("db_path", &self.db_path)
            .field("admin_socket", &self.admin_socket)
            .finish()
    }
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let channel_raw = get("CHANNEL_ID").ok_or(ConfigError::Missing("CHANNEL_ID"))?;
        let channel_id = channel_raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key: "CHANNEL_ID",
                value: channel_raw.clone(),
            })?;

        let admin_ids = match get("ADMIN_IDS") {
            Some(raw) => parse_admin_ids(&raw)?,
            None => Vec::new(),
        };

        let db_path = PathBuf::from(get("DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()));

        let admin_socket = get("ADMIN_SOCKET")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ADMIN_SOCKET));

        Ok(Self {
            bot_token: bot_token.trim().to_string(),
            channel_id,
            admin_ids,
            db_path,
            admin_socket,
        })
    }
}

/// Parse a comma separated id list, skipping blank entries.
fn parse_admin_ids(raw: &str) -> Result<Vec<UserId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|_| ConfigError::Invalid {
                key: "ADMIN_IDS",
                value: s.to_string(),
            })
        })
        .collect()
}
