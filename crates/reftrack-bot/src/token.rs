//! Invite tokens - the referrer identity carried in an invite link's name.
//!
//! The platform stores invite links and hands their `name` back on every
//! join. A link issued by this bot is named `ref_<owner id>`; this module
//! is the only place that knows that format.

use reftrack_ledger::UserId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name prefix of every link issued by the bot.
pub const TOKEN_PREFIX: &str = "ref_";

/// Largest owner id a link name may carry.
pub const MAX_OWNER: UserId = i64::MAX as UserId;

/// Why a link name does not identify a referrer.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The link was not issued by this bot (self-made or promo links)
    #[error("link name does not carry the referral prefix")]
    Foreign,

    /// The prefix matched but the owner id is not a valid user id
    #[error("link name carries a malformed owner id")]
    MalformedOwner,
}

/// A referral invite token owned by one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InviteToken {
    owner: UserId,
}

impl InviteToken {
    /// Token for links issued to `owner`.
    pub fn new(owner: UserId) -> Self {
        Self { owner }
    }

    /// The referrer credited for joins through this token.
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// The link name sent to the platform.
    pub fn link_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InviteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", TOKEN_PREFIX, self.owner)
    }
}

impl FromStr for InviteToken {
    type Err = TokenError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let digits = name.strip_prefix(TOKEN_PREFIX).ok_or(TokenError::Foreign)?;

        // `u64::from_str` accepts a leading '+', which a link we issued never has
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TokenError::MalformedOwner);
        }

        // Platform user ids are signed 64-bit
        let owner: UserId = digits.parse().map_err(|_| TokenError::MalformedOwner)?;
        if owner > MAX_OWNER {
            return Err(TokenError::MalformedOwner);
        }
        Ok(Self { owner })
    }
}
