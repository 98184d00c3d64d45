//! Update routing.
//!
//! - private-chat messages carrying a known command go to [`commands`]
//! - membership updates in the target chat go to [`reconciler`]
//! - everything else (group chatter, foreign chats) is dropped silently

use crate::commands::{self, Command};
use crate::context::AppContext;
use crate::error::Error;
use crate::membership::MembershipTransition;
use crate::platform::{Platform, TelegramPlatform};
use crate::reconciler;
use std::sync::Arc;
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{ChatMemberUpdated, Me, Message, Update};

/// Context type injected into every endpoint in production.
pub type BotContext = AppContext<TelegramPlatform>;

/// Build the handler tree. Endpoints expect an `Arc<AppContext<P>>` and
/// the bot's `Me` among the dependencies.
pub fn schema<P: Platform>() -> UpdateHandler<Error> {
    let private_commands = Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private())
        .filter_map(|msg: Message, me: Me| commands::parse_command(msg.text()?, me.username()))
        .endpoint(on_command::<P>);

    let target_membership = Update::filter_chat_member()
        .filter(|update: ChatMemberUpdated, ctx: Arc<AppContext<P>>| {
            update.chat.id.0 == ctx.config.channel_id
        })
        .endpoint(on_membership::<P>);

    dptree::entry()
        .branch(private_commands)
        .branch(target_membership)
}

async fn on_command<P: Platform>(
    ctx: Arc<AppContext<P>>,
    msg: Message,
    command: Command,
) -> Result<(), Error> {
    let Some(caller) = msg.from.as_ref().map(|user| user.id.0) else {
        return Ok(());
    };
    commands::execute(&ctx, msg.chat.id.0, caller, command).await
}

async fn on_membership<P: Platform>(
    ctx: Arc<AppContext<P>>,
    update: ChatMemberUpdated,
) -> Result<(), Error> {
    let transition = MembershipTransition::from(&update);
    let outcome = reconciler::reconcile(&ctx, &transition).await?;
    outcome.log(&transition);
    Ok(())
}
