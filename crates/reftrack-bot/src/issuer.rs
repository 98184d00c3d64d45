//! Invite link issuer.

use crate::context::AppContext;
use crate::platform::Platform;
use crate::token::InviteToken;
use reftrack_ledger::UserId;

/// Ask the platform for a personal invite link to the target chat.
///
/// The link joins instantly (no join request) and is named after its
/// owner so joins through it can be credited. Any platform failure is
/// logged and turned into `None`; callers show a fallback message.
pub async fn issue<P: Platform>(ctx: &AppContext<P>, owner: UserId) -> Option<String> {
    let token = InviteToken::new(owner);
    match ctx
        .platform
        .create_invite_link(ctx.config.channel_id, token.link_name(), false)
        .await
    {
        Ok(link) => {
            tracing::info!(owner, "Issued invite link");
            Some(link)
        }
        Err(e) => {
            tracing::error!(owner, error = %e, "Invite link error");
            None
        }
    }
}
