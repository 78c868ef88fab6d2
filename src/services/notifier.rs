use async_trait::async_trait;
use teloxide::prelude::*;

pub type NotifyError = Box<dyn std::error::Error + Send + Sync>;

/// Outbound side of the chat transport used by jobs that message users
/// without an incoming update.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, telegram_id: i64, text: &str) -> Result<(), NotifyError>;
}

#[async_trait]
impl Notifier for Bot {
    async fn notify(&self, telegram_id: i64, text: &str) -> Result<(), NotifyError> {
        // A private chat has the same id as the user.
        self.send_message(ChatId(telegram_id), text).await?;
        Ok(())
    }
}
