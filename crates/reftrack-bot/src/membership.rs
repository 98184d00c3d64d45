//! Membership transitions and their classification.

use reftrack_ledger::UserId;
use teloxide::types::{ChatMemberStatus, ChatMemberUpdated};

/// Membership status reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Left,
    Kicked,
    Member,
    Administrator,
    Creator,
    /// Restricted members; neither inside nor outside for crediting purposes
    Restricted,
}

/// Collapsed view of a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Outside,
    Inside,
}

impl MemberStatus {
    /// `None` for statuses that take no part in crediting.
    pub fn presence(self) -> Option<Presence> {
        match self {
            MemberStatus::Left | MemberStatus::Kicked => Some(Presence::Outside),
            MemberStatus::Member | MemberStatus::Administrator | MemberStatus::Creator => {
                Some(Presence::Inside)
            }
            MemberStatus::Restricted => None,
        }
    }
}

impl From<ChatMemberStatus> for MemberStatus {
    fn from(status: ChatMemberStatus) -> Self {
        match status {
            ChatMemberStatus::Owner => MemberStatus::Creator,
            ChatMemberStatus::Administrator => MemberStatus::Administrator,
            ChatMemberStatus::Member => MemberStatus::Member,
            ChatMemberStatus::Restricted => MemberStatus::Restricted,
            ChatMemberStatus::Left => MemberStatus::Left,
            ChatMemberStatus::Banned => MemberStatus::Kicked,
        }
    }
}

/// What a transition means for the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Outside -> Inside; credited if the invite link names a referrer
    Join,
    /// Inside -> Outside
    Leave,
    /// Promotions, demotions, restrictions and outside-to-outside moves
    NoOp,
}

/// The user whose membership changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub id: UserId,
    pub first_name: String,
}

/// One membership change in some chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipTransition {
    pub chat_id: i64,
    pub user: ChatUser,
    pub old_status: MemberStatus,
    pub new_status: MemberStatus,
    /// Name of the invite link the user joined through, if the platform reported one
    pub invite_link_name: Option<String>,
}

impl MembershipTransition {
    pub fn kind(&self) -> TransitionKind {
        match (self.old_status.presence(), self.new_status.presence()) {
            (Some(Presence::Outside), Some(Presence::Inside)) => TransitionKind::Join,
            (Some(Presence::Inside), Some(Presence::Outside)) => TransitionKind::Leave,
            _ => TransitionKind::NoOp,
        }
    }
}

impl From<&ChatMemberUpdated> for MembershipTransition {
    fn from(update: &ChatMemberUpdated) -> Self {
        let user = &update.new_chat_member.user;
        Self {
            chat_id: update.chat.id.0,
            user: ChatUser {
                id: user.id.0,
                first_name: user.first_name.clone(),
            },
            old_status: update.old_chat_member.kind.status().into(),
            new_status: update.new_chat_member.kind.status().into(),
            invite_link_name: update
                .invite_link
                .as_ref()
                .and_then(|link| link.name.clone()),
        }
    }
}
