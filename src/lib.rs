//! # Quit Streak Bot
//!
//! A Telegram bot that helps people quit a bad habit by counting the days
//! since they last gave in.
//!
//! ## Features
//! - Guided registration: name your weakness and, optionally, when you quit
//! - `/days` to see the current streak, `/failed` to start over
//! - Daily encouragement with the current streak
//! - Persistent storage with SQLite

/// Bot commands, registration dialogue and update handlers
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Application context shared by handlers and jobs
pub mod context;
/// Database models, connections, and migrations
pub mod database;
/// Streak logic, the daily broadcast and the health endpoint
pub mod services;
/// Utility functions for dates, validation, replies and logging
pub mod utils;
