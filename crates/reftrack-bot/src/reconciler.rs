//! Membership event reconciliation.
//!
//! Maps membership transitions in the target chat onto the ledger:
//!
//! | old     | new     | action                          |
//! |---------|---------|---------------------------------|
//! | Outside | Inside  | credit the link owner, notify   |
//! | Inside  | Outside | purge every credit of the user  |
//! | other   |         | nothing                         |
//!
//! Crediting is idempotent through the ledger's composite key: a replayed
//! join finds the row already present and sends no second notification.
//! Ledger errors propagate; platform errors never do.

use crate::context::AppContext;
use crate::error::Result;
use crate::membership::{MembershipTransition, TransitionKind};
use crate::notifier;
use crate::platform::Platform;
use crate::token::{InviteToken, TokenError};
use reftrack_ledger::UserId;

/// Why a join was not credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The platform reported no invite link, or an unnamed one
    NoInviteLink,
    /// The link was not issued by this bot
    ForeignLink,
    /// The link looked like ours but its owner id did not parse
    MalformedReferrer,
}

impl From<TokenError> for SkipReason {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Foreign => SkipReason::ForeignLink,
            TokenError::MalformedOwner => SkipReason::MalformedReferrer,
        }
    }
}

/// Result of reconciling one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event belongs to a chat other than the target chat
    ForeignChat,
    /// Not a join or leave
    Unchanged,
    /// A join that carries no usable referrer
    Ignored(SkipReason),
    /// First credit for this pair
    Credited {
        referrer_id: UserId,
        user_id: UserId,
        notified: bool,
    },
    /// The pair was already credited (replayed event)
    AlreadyCredited { referrer_id: UserId, user_id: UserId },
    /// The user left; `removed` credits were reversed
    Purged { user_id: UserId, removed: usize },
}

impl Outcome {
    /// Log the outcome; ledger mutations at info, everything else at debug.
    pub fn log(&self, transition: &MembershipTransition) {
        match self {
            Outcome::Credited {
                referrer_id,
                user_id,
                notified,
            } => tracing::info!(referrer_id, user_id, notified, "Referral credited"),
            Outcome::Purged { user_id, removed } if *removed > 0 => {
                tracing::info!(user_id, removed, "Referral credits reversed")
            }
            other => tracing::debug!(
                chat_id = transition.chat_id,
                user_id = transition.user.id,
                outcome = ?other,
                "Membership update without ledger change"
            ),
        }
    }
}

/// Extract the referrer from an invite link name.
pub fn referrer_of(invite_link_name: Option<&str>) -> std::result::Result<UserId, SkipReason> {
    let name = invite_link_name.ok_or(SkipReason::NoInviteLink)?;
    let token: InviteToken = name.parse()?;
    Ok(token.owner())
}

/// Apply one membership transition to the ledger.
pub async fn reconcile<P: Platform>(
    ctx: &AppContext<P>,
    transition: &MembershipTransition,
) -> Result<Outcome> {
    if transition.chat_id != ctx.config.channel_id {
        return Ok(Outcome::ForeignChat);
    }

    match transition.kind() {
        TransitionKind::Join => on_join(ctx, transition).await,
        TransitionKind::Leave => on_leave(ctx, transition.user.id).await,
        TransitionKind::NoOp => Ok(Outcome::Unchanged),
    }
}

async fn on_join<P: Platform>(
    ctx: &AppContext<P>,
    transition: &MembershipTransition,
) -> Result<Outcome> {
    let referrer_id = match referrer_of(transition.invite_link_name.as_deref()) {
        Ok(id) => id,
        Err(reason) => return Ok(Outcome::Ignored(reason)),
    };
    let user_id = transition.user.id;

    let created = ctx
        .with_ledger(move |ledger| ledger.insert_if_absent(referrer_id, user_id))
        .await?;
    if !created {
        return Ok(Outcome::AlreadyCredited {
            referrer_id,
            user_id,
        });
    }

    let notified = notifier::notify_referrer(ctx, referrer_id, &transition.user.first_name).await;
    Ok(Outcome::Credited {
        referrer_id,
        user_id,
        notified,
    })
}

async fn on_leave<P: Platform>(ctx: &AppContext<P>, user_id: UserId) -> Result<Outcome> {
    let removed = ctx
        .with_ledger(move |ledger| ledger.delete_by_user(user_id))
        .await?;
    Ok(Outcome::Purged { user_id, removed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::{ChatUser, MemberStatus};
    use crate::testing::{self, CHANNEL_ID};
    use std::sync::atomic::Ordering;

    fn event(old: MemberStatus, new: MemberStatus, link: Option<&str>) -> MembershipTransition {
        MembershipTransition {
            chat_id: CHANNEL_ID,
            user: ChatUser {
                id: 777,
                first_name: "Ann".to_string(),
            },
            old_status: old,
            new_status: new,
            invite_link_name: link.map(str::to_string),
        }
    }

    fn join(link: Option<&str>) -> MembershipTransition {
        event(MemberStatus::Left, MemberStatus::Member, link)
    }

    #[test]
    fn referrer_extraction() {
        assert_eq!(referrer_of(Some("ref_555")), Ok(555));
        assert_eq!(referrer_of(None), Err(SkipReason::NoInviteLink));
        assert_eq!(referrer_of(Some("promo_123")), Err(SkipReason::ForeignLink));
        assert_eq!(referrer_of(Some("ref_x1")), Err(SkipReason::MalformedReferrer));
    }

    #[tokio::test]
    async fn join_credits_and_notifies_once() {
        let (_dir, ctx) = testing::context();

        let first = reconcile(&ctx, &join(Some("ref_555"))).await.unwrap();
        assert_eq!(
            first,
            Outcome::Credited {
                referrer_id: 555,
                user_id: 777,
                notified: true
            }
        );

        let second = reconcile(&ctx, &join(Some("ref_555"))).await.unwrap();
        assert_eq!(
            second,
            Outcome::AlreadyCredited {
                referrer_id: 555,
                user_id: 777
            }
        );

        assert_eq!(ctx.ledger.count(555).unwrap(), 1);
        assert_eq!(ctx.platform.sent().len(), 1);
    }

    #[tokio::test]
    async fn joins_without_referrer_change_nothing() {
        let (_dir, ctx) = testing::context();

        for (link, reason) in [
            (None, SkipReason::NoInviteLink),
            (Some("promo_123"), SkipReason::ForeignLink),
            (Some("ref_"), SkipReason::MalformedReferrer),
            (Some("ref_9223372036854775808"), SkipReason::MalformedReferrer),
            (Some("ref_18446744073709451493"), SkipReason::MalformedReferrer),
        ] {
            let outcome = reconcile(&ctx, &join(link)).await.unwrap();
            assert_eq!(outcome, Outcome::Ignored(reason));
        }

        assert_eq!(ctx.ledger.delete_by_user(777).unwrap(), 0);
        assert!(ctx.platform.sent().is_empty());
    }

    #[tokio::test]
    async fn notify_failure_keeps_credit() {
        let (_dir, ctx) = testing::context();
        ctx.platform.fail_sends.store(true, Ordering::SeqCst);

        let outcome = reconcile(&ctx, &join(Some("ref_555"))).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Credited {
                referrer_id: 555,
                user_id: 777,
                notified: false
            }
        );
        assert_eq!(ctx.ledger.count(555).unwrap(), 1);

        // A replay is not a second chance to notify
        ctx.platform.fail_sends.store(false, Ordering::SeqCst);
        reconcile(&ctx, &join(Some("ref_555"))).await.unwrap();
        assert!(ctx.platform.sent().is_empty());
    }

    #[tokio::test]
    async fn leave_purges_all_referrers() {
        let (_dir, ctx) = testing::context();
        ctx.ledger.insert_if_absent(1, 777).unwrap();
        ctx.ledger.insert_if_absent(2, 777).unwrap();

        let outcome = reconcile(&ctx, &event(MemberStatus::Administrator, MemberStatus::Kicked, None))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Purged {
                user_id: 777,
                removed: 2
            }
        );
        assert_eq!(ctx.ledger.count(1).unwrap(), 0);
        assert_eq!(ctx.ledger.count(2).unwrap(), 0);
    }

    #[tokio::test]
    async fn leave_without_credits_is_noop() {
        let (_dir, ctx) = testing::context();

        let outcome = reconcile(&ctx, &event(MemberStatus::Member, MemberStatus::Left, None))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Purged {
                user_id: 777,
                removed: 0
            }
        );
    }

    #[tokio::test]
    async fn promotion_is_unchanged() {
        let (_dir, ctx) = testing::context();

        let outcome = reconcile(
            &ctx,
            &event(MemberStatus::Member, MemberStatus::Administrator, Some("ref_555")),
        )
        .await
        .unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(ctx.ledger.count(555).unwrap(), 0);
    }

    #[tokio::test]
    async fn other_chats_are_ignored() {
        let (_dir, ctx) = testing::context();
        let mut transition = join(Some("ref_555"));
        transition.chat_id = CHANNEL_ID - 1;

        assert_eq!(reconcile(&ctx, &transition).await.unwrap(), Outcome::ForeignChat);
        assert_eq!(ctx.ledger.count(555).unwrap(), 0);
        assert!(ctx.platform.sent().is_empty());
    }

    #[tokio::test]
    async fn self_referral_is_credited() {
        let (_dir, ctx) = testing::context();

        let outcome = reconcile(&ctx, &join(Some("ref_777"))).await.unwrap();
        assert!(matches!(outcome, Outcome::Credited { referrer_id: 777, user_id: 777, .. }));
    }
}
