use anyhow::{anyhow, Result};
use std::env;
use tokio_cron_scheduler::Job;
use url::Url;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/streaks.db";
const DEFAULT_BROADCAST_CRON: &str = "0 0 8 * * *";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    /// Port of the health check server.
    pub http_port: u16,
    /// Port the webhook listener binds to when `webhook_url` is set.
    pub webhook_port: u16,
    /// Public base URL Telegram posts updates to. `None` means long polling.
    pub webhook_url: Option<Url>,
    pub broadcast_cron: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let http_port = parse_port("HTTP_PORT", 3000)?;
        let webhook_port = parse_port("PORT", 5001)?;

        let webhook_url = match env::var("WEBHOOK_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Url::parse(raw.trim()).map_err(|e| anyhow!("Invalid WEBHOOK_URL: {e}"))?,
            ),
            _ => None,
        };

        if webhook_url.is_some() && webhook_port == http_port {
            return Err(anyhow!(
                "PORT and HTTP_PORT must differ when WEBHOOK_URL is set (both are {http_port})"
            ));
        }

        let broadcast_cron = env::var("DAILY_BROADCAST_CRON")
            .ok()
            .filter(|cron| !cron.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BROADCAST_CRON.to_string());
        validate_cron(&broadcast_cron)?;

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            webhook_port,
            webhook_url,
            broadcast_cron,
        })
    }

    /// Full URL Telegram should deliver updates to: the public base with the
    /// bot token appended as the last path segment.
    pub fn webhook_endpoint(&self) -> Option<Url> {
        let base = self.webhook_url.as_ref()?;
        let mut url = base.clone();
        let path = format!(
            "{}/{}",
            base.path().trim_end_matches('/'),
            self.telegram_bot_token.trim()
        );
        url.set_path(&path);
        Some(url)
    }
}

fn parse_port(var: &str, default: u16) -> Result<u16> {
    let port_str = env::var(var).unwrap_or_else(|_| default.to_string());
    port_str
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid {var}"))
}

/// Rejects schedules the broadcast job could never be registered with.
fn validate_cron(expr: &str) -> Result<()> {
    Job::new_async(expr, |_uuid, _l| Box::pin(async {}))
        .map(|_| ())
        .map_err(|e| anyhow!("Invalid DAILY_BROADCAST_CRON '{expr}': {e}"))
}
