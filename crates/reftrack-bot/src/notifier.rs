//! Best-effort referrer notifications.

use crate::context::AppContext;
use crate::platform::{Platform, TextMode};
use crate::replies;
use reftrack_ledger::UserId;

/// Tell `referrer_id` that someone joined through their link.
///
/// Returns whether the message was delivered. Failures (blocked bot,
/// deactivated account, network) are logged and never propagate; a credit
/// stands whether or not its notification arrives.
pub async fn notify_referrer<P: Platform>(
    ctx: &AppContext<P>,
    referrer_id: UserId,
    invited_first_name: &str,
) -> bool {
    // A user id addresses the private chat with that user
    let Ok(chat_id) = i64::try_from(referrer_id) else {
        tracing::warn!(referrer_id, "Notify error: id is not a chat id");
        return false;
    };
    let text = replies::referral_joined(invited_first_name);
    match ctx.platform.send_message(chat_id, text, TextMode::Plain).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(referrer_id, error = %e, "Notify error");
            false
        }
    }
}
