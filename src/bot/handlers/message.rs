use std::sync::Arc;

use chrono::NaiveDate;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use super::{HandlerError, HandlerResult, RegistrationDialogue, RegistrationStorage};
use crate::bot::commands::Command;
use crate::bot::dialogue::Input;
use crate::bot::replies;
use crate::context::AppContext;
use crate::database::{connection::DatabaseManager, models::UserProfile};
use crate::services::registration::{self, Step};
use crate::services::streak;
use crate::utils::datetime::today;
use crate::utils::feedback::{CommandFeedback, Reply};
use crate::utils::logging::{
    log_command_error, log_command_start, log_command_success, log_database_error,
};

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    storage: Arc<RegistrationStorage>,
    ctx: AppContext,
) -> HandlerResult {
    let Some(profile) = sender_profile(&msg) else {
        return Ok(());
    };
    log_command_start(
        command_name(&cmd),
        profile.username.as_deref().unwrap_or("unknown"),
        profile.telegram_id,
        msg.chat.id.0,
    );

    let feedback = CommandFeedback::new(bot, msg.chat.id);

    match cmd {
        Command::Help => {
            feedback
                .send(&Reply::text(Command::descriptions().to_string()))
                .await?;
        }
        Command::Days => handle_days(&feedback, &ctx, profile.telegram_id).await?,
        Command::Failed => handle_failed(&feedback, &ctx, profile.telegram_id).await?,
        Command::Start | Command::Skip | Command::Cancel => {
            if let Some(input) = Input::from_command(&cmd) {
                let step = converse(storage, &ctx.db, &profile, input, today()).await?;
                feedback.send_all(&step.replies).await?;
            }
        }
    }

    Ok(())
}

/// Free text is only meaningful as an answer inside the registration
/// conversation.
pub async fn text_handler(
    bot: Bot,
    msg: Message,
    storage: Arc<RegistrationStorage>,
    ctx: AppContext,
) -> HandlerResult {
    let (Some(text), Some(profile)) = (msg.text(), sender_profile(&msg)) else {
        return Ok(());
    };

    let step = converse(storage, &ctx.db, &profile, Input::Text(text.to_string()), today()).await?;
    CommandFeedback::new(bot, msg.chat.id)
        .send_all(&step.replies)
        .await?;
    Ok(())
}

/// Feeds `input` into the sender's registration conversation and persists
/// the resulting state. State is stored under the sender's id, so a shared
/// chat holds an independent conversation per member.
pub async fn converse(
    storage: Arc<RegistrationStorage>,
    db: &DatabaseManager,
    profile: &UserProfile,
    input: Input,
    today: NaiveDate,
) -> Result<Step, HandlerError> {
    let dialogue = RegistrationDialogue::new(storage, ChatId(profile.telegram_id));
    let state = dialogue.get_or_default().await?;

    let step = registration::advance(db, profile, &state, input, today)
        .await
        .map_err(|e| {
            log_database_error("registration step", "users", &e.to_string());
            e
        })?;

    // `Done` is never stored: a missing dialogue already reads as `Done`.
    if step.next.in_conversation() {
        if step.next != state {
            dialogue.update(step.next.clone()).await?;
        }
    } else if state.in_conversation() {
        dialogue.exit().await?;
    }

    Ok(step)
}

async fn handle_days(feedback: &CommandFeedback, ctx: &AppContext, user_id: i64) -> HandlerResult {
    let days = streak::days_holding(&ctx.db, user_id, today())
        .await
        .map_err(|e| {
            log_command_error("days", user_id, &e.to_string());
            e
        })?;

    let reply = match days {
        Some(days) => {
            log_command_success("days", user_id, Some(&format!("{days} days")));
            replies::holding_on(days)
        }
        None => {
            log_command_error("days", user_id, "user is not registered");
            replies::NOT_REGISTERED.to_string()
        }
    };

    feedback.send(&Reply::text(reply)).await?;
    Ok(())
}

async fn handle_failed(feedback: &CommandFeedback, ctx: &AppContext, user_id: i64) -> HandlerResult {
    let restarted = streak::start_over(&ctx.db, user_id, today())
        .await
        .map_err(|e| {
            log_command_error("failed", user_id, &e.to_string());
            e
        })?;

    let reply = if restarted {
        log_command_success("failed", user_id, Some("streak restarted"));
        replies::START_OVER
    } else {
        log_command_error("failed", user_id, "user is not registered");
        replies::NOT_REGISTERED
    };

    feedback.send(&Reply::text(reply)).await?;
    Ok(())
}

/// Profile of the account that sent `msg`. `None` for messages without a
/// sender, such as channel posts.
pub fn sender_profile(msg: &Message) -> Option<UserProfile> {
    let user = msg.from()?;
    Some(UserProfile {
        telegram_id: i64::try_from(user.id.0).ok()?,
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()),
        last_name: user.last_name.clone(),
    })
}

fn command_name(cmd: &Command) -> &'static str {
    match cmd {
        Command::Help => "/help",
        Command::Start => "/start",
        Command::Skip => "/skip",
        Command::Cancel => "/cancel",
        Command::Days => "/days",
        Command::Failed => "/failed",
    }
}
