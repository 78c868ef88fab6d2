//! # Quit Streak Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, starts the
//! daily broadcast and the health server, and runs the Telegram bot either
//! with long polling or behind a webhook.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use teloxide::utils::command::BotCommands;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quit_streak_bot::bot::commands::Command;
use quit_streak_bot::bot::handlers::{BotHandler, RegistrationStorage};
use quit_streak_bot::config::Config;
use quit_streak_bot::context::AppContext;
use quit_streak_bot::database::connection::DatabaseManager;
use quit_streak_bot::services::broadcast::BroadcastService;
use quit_streak_bot::services::health::HealthService;
use quit_streak_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quit_streak_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Quit Streak Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Broadcast: '{}'",
        config.database_url, config.http_port, config.broadcast_cron
    );

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    info!("Database initialized successfully");

    let bot = Bot::new(&config.telegram_bot_token);
    let ctx = AppContext::new(db_manager.clone(), Arc::new(bot.clone()));
    let handler = BotHandler::new(ctx.clone());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register bot commands with Telegram: {}", e);
    }

    // Initialize and start the daily broadcast
    let mut broadcast_service = BroadcastService::new(ctx.clone(), config.broadcast_cron.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create broadcast service: {}", e))?;

    broadcast_service
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start broadcast service: {}", e))?;

    // Initialize health service
    let health_service = HealthService::new(Arc::new(db_manager));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    let webhook_endpoint = config.webhook_endpoint();
    let webhook_port = config.webhook_port;

    let bot_task = tokio::spawn(async move {
        let storage: Arc<RegistrationStorage> = RegistrationStorage::new();
        let mut dispatcher = Dispatcher::builder(bot.clone(), handler.schema())
            .dependencies(dptree::deps![storage])
            .enable_ctrlc_handler()
            .build();

        match webhook_endpoint {
            Some(url) => {
                let addr = SocketAddr::from(([0, 0, 0, 0], webhook_port));
                log_system_event("Receiving updates via webhook", Some(&format!("listening on {addr}")));
                match webhooks::axum(bot, webhooks::Options::new(addr, url)).await {
                    Ok(listener) => {
                        dispatcher
                            .dispatch_with_listener(
                                listener,
                                LoggingErrorHandler::with_custom_text("An error from the update listener"),
                            )
                            .await;
                    }
                    Err(e) => tracing::error!("Failed to set up webhook: {}", e),
                }
            }
            None => {
                log_system_event("Receiving updates via long polling", None);
                dispatcher.dispatch().await;
            }
        }
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = health_task => {
            if let Err(e) = result2 {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    // Stop broadcast service on shutdown
    if let Err(e) = broadcast_service.stop().await {
        tracing::warn!("Error stopping broadcast service: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
