pub mod message;

use std::sync::Arc;

use teloxide::{
    dispatching::{dialogue::InMemStorage, UpdateHandler},
    prelude::*,
};

use crate::bot::commands::Command;
use crate::bot::dialogue::RegistrationState;
use crate::context::AppContext;

pub type RegistrationStorage = InMemStorage<RegistrationState>;
/// Registration conversation of one user. Keyed by the sender's Telegram id,
/// not by the chat, so members of a shared chat never step on each other.
pub type RegistrationDialogue = Dialogue<RegistrationState, RegistrationStorage>;
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

pub struct BotHandler {
    pub ctx: AppContext,
}

impl BotHandler {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Routing tree. Requires an `Arc<RegistrationStorage>` among the
    /// dispatcher dependencies.
    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        let ctx = self.ctx.clone();
        let ctx_text = self.ctx.clone();

        Update::filter_message()
            .branch(dptree::entry().filter_command::<Command>().endpoint(
                move |bot: Bot, msg: Message, cmd: Command, storage: Arc<RegistrationStorage>| {
                    let ctx = ctx.clone();
                    async move { message::command_handler(bot, msg, cmd, storage, ctx).await }
                },
            ))
            .branch(dptree::endpoint(
                move |bot: Bot, msg: Message, storage: Arc<RegistrationStorage>| {
                    let ctx = ctx_text.clone();
                    async move { message::text_handler(bot, msg, storage, ctx).await }
                },
            ))
    }
}
