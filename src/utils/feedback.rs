use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

/// Suggested-reply keyboard shown under a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKeyboard {
    /// Leave whatever keyboard the client shows untouched.
    Keep,
    /// One-time keyboard with a single `/cancel` button.
    Cancel,
    /// One-time keyboard with a single `/skip` button.
    Skip,
    /// Hide the suggested-reply keyboard.
    Remove,
}

impl ReplyKeyboard {
    fn command(&self) -> Option<&'static str> {
        match self {
            ReplyKeyboard::Cancel => Some("/cancel"),
            ReplyKeyboard::Skip => Some("/skip"),
            ReplyKeyboard::Keep | ReplyKeyboard::Remove => None,
        }
    }

    pub fn markup(&self) -> Option<ReplyMarkup> {
        if let Some(command) = self.command() {
            let keyboard = KeyboardMarkup::new(vec![vec![KeyboardButton::new(command)]])
                .one_time_keyboard(true)
                .resize_keyboard(true);
            return Some(ReplyMarkup::Keyboard(keyboard));
        }

        match self {
            ReplyKeyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
            _ => None,
        }
    }
}

/// A plain text reply and the keyboard to show with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: ReplyKeyboard,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: ReplyKeyboard::Keep,
        }
    }

    pub fn with_keyboard(mut self, keyboard: ReplyKeyboard) -> Self {
        self.keyboard = keyboard;
        self
    }
}

/// Sends replies into a single chat
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
}

impl CommandFeedback {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    pub async fn send(&self, reply: &Reply) -> ResponseResult<Message> {
        let request = self.bot.send_message(self.chat_id, reply.text.clone());
        match reply.keyboard.markup() {
            Some(markup) => request.reply_markup(markup).await,
            None => request.await,
        }
    }

    /// Sends replies in order, stopping at the first delivery error.
    pub async fn send_all(&self, replies: &[Reply]) -> ResponseResult<()> {
        for reply in replies {
            self.send(reply).await?;
        }
        Ok(())
    }
}
