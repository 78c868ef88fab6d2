/// Slash commands understood by the bot
pub mod commands;
/// Registration conversation states and transitions
pub mod dialogue;
/// Update routing and handler endpoints
pub mod handlers;
/// Reply texts
pub mod replies;
