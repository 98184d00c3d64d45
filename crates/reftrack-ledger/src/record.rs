//! Referral record - one confirmed credit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque platform user identifier.
pub type UserId = u64;

/// A confirmed referral: `user_id` joined the target chat through a link
/// owned by `referrer_id`.
///
/// Records are immutable. They are created once and later deleted; there
/// is no update path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferralRecord {
    /// Owner of the invite link
    pub referrer_id: UserId,

    /// The user who joined
    pub user_id: UserId,

    /// When the credit was recorded
    pub joined_at: DateTime<Utc>,
}

impl ReferralRecord {
    /// Create a record stamped with the current time.
    pub fn new(referrer_id: UserId, user_id: UserId) -> Self {
        Self {
            referrer_id,
            user_id,
            joined_at: Utc::now(),
        }
    }

    /// Key prefix shared by all rows of a referrer.
    pub fn referrer_prefix(referrer_id: UserId) -> String {
        format!("join:{}:", referrer_id)
    }

    /// Key prefix shared by all index entries of an invited user.
    pub fn user_index_prefix(user_id: UserId) -> String {
        format!("join_by_user:{}:", user_id)
    }

    /// Primary key of the `(referrer, user)` row.
    pub fn row_key(referrer_id: UserId, user_id: UserId) -> String {
        format!("{}{}", Self::referrer_prefix(referrer_id), user_id)
    }

    /// Index key pointing from a user back to one of their referrers.
    pub fn index_key(user_id: UserId, referrer_id: UserId) -> String {
        format!("{}{}", Self::user_index_prefix(user_id), referrer_id)
    }
}
