//! Everything the bot says. Kept in one place so handlers and tests agree on
//! the exact wording.

pub const REGISTERED: &str = "You are registered!";
pub const ASK_TITLE: &str = "Enter your weakness title:";
pub const ASK_START_DATE: &str =
    "Enter start date (DD/MM/YYYY) if any or /skip if you want to set it automatically:";
pub const WEAKNESS_CREATED: &str = "You have created your weakness!";
pub const START_DATE_KEPT: &str = "Fine, your streak keeps its current start date.";
pub const FAREWELL: &str = "See you!";
pub const START_OVER: &str = "Don't give up! You should start over!";
pub const NOT_REGISTERED: &str = "You are not registered yet. Send /start to begin.";

pub fn already_registered(name: &str) -> String {
    format!("You are already registered, {name}!")
}

/// Used both for `/days` and for the daily broadcast.
pub fn holding_on(days: i64) -> String {
    format!("You are holding on {days} days! Keep going!")
}

pub fn invalid_title(reason: &str) -> String {
    format!("{reason}. Please enter your weakness title again:")
}

pub fn invalid_start_date(reason: &str) -> String {
    format!("{reason}. Enter the date as DD/MM/YYYY or /skip:")
}
