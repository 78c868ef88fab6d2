use std::sync::Arc;

use crate::database::connection::DatabaseManager;
use crate::services::notifier::Notifier;

/// Shared application state, built once at startup and handed to the bot
/// handlers and the broadcast job.
#[derive(Clone)]
pub struct AppContext {
    pub db: DatabaseManager,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    pub fn new(db: DatabaseManager, notifier: Arc<dyn Notifier>) -> Self {
        Self { db, notifier }
    }
}
