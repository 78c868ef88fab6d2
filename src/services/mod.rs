pub mod broadcast;
pub mod health;
pub mod notifier;
pub mod registration;
pub mod streak;
