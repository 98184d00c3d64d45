//! Private-chat commands.

use crate::context::AppContext;
use crate::error::Result;
use crate::issuer;
use crate::platform::{Platform, TextMode};
use crate::replies;
use reftrack_ledger::UserId;
use teloxide::utils::command::BotCommands;

/// Commands understood in private chats.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Referral bot commands:")]
pub enum Command {
    #[command(description = "check that the bot is alive")]
    Ping,
    #[command(description = "get your personal invite link")]
    Link,
    #[command(description = "show how many people joined through your link")]
    MyReferrals,
}

/// Parse the command word of `text`, ignoring anything after it.
///
/// `/ping extra` is `/ping`; unknown commands and plain text yield `None`.
pub fn parse_command(text: &str, bot_name: &str) -> Option<Command> {
    let word = text.split_whitespace().next()?;
    Command::parse(word, bot_name).ok()
}

/// Execute `command` for `caller`, replying into `chat_id`.
///
/// A failed reply is logged and dropped. Only ledger errors propagate.
pub async fn execute<P: Platform>(
    ctx: &AppContext<P>,
    chat_id: i64,
    caller: UserId,
    command: Command,
) -> Result<()> {
    let (text, mode) = match command {
        Command::Ping => (replies::PONG.to_string(), TextMode::Plain),
        Command::Link => match issuer::issue(ctx, caller).await {
            Some(link) => (replies::link_issued(&link), TextMode::Plain),
            None => (replies::LINK_FAILED.to_string(), TextMode::Plain),
        },
        Command::MyReferrals => {
            let count = ctx.with_ledger(move |ledger| ledger.count(caller)).await?;
            (replies::referral_count(count), TextMode::Html)
        }
    };

    if let Err(e) = ctx.platform.send_message(chat_id, text, mode).await {
        tracing::warn!(chat_id, ?command, error = %e, "Reply failed");
    }
    Ok(())
}
