use chrono::NaiveDate;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::bot::replies;
use crate::context::AppContext;
use crate::database::models::User;
use crate::services::notifier::Notifier;
use crate::utils::datetime::{elapsed_days, today};

/// How one broadcast sweep went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
}

/// Sends every user with notifications enabled their current streak, once a
/// day on the configured cron schedule.
pub struct BroadcastService {
    ctx: AppContext,
    schedule: String,
    scheduler: JobScheduler,
}

impl BroadcastService {
    pub async fn new(
        ctx: AppContext,
        schedule: impl Into<String>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            ctx,
            schedule: schedule.into(),
            scheduler,
        })
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = self.ctx.clone();

        let broadcast_job = Job::new_async(self.schedule.as_str(), move |_uuid, _l| {
            let ctx = ctx.clone();
            Box::pin(async move {
                match send_daily_broadcast(&ctx, today()).await {
                    Ok(report) => tracing::info!(
                        "Daily broadcast finished: {} sent, {} failed",
                        report.sent,
                        report.failed
                    ),
                    Err(e) => tracing::error!("Daily broadcast failed: {}", e),
                }
            })
        })?;

        self.scheduler.add(broadcast_job).await?;
        self.scheduler.start().await?;

        tracing::info!("Broadcast service started with schedule '{}' (UTC)", self.schedule);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    // Manual trigger, bypasses the schedule
    pub async fn broadcast_now(&self) -> Result<BroadcastReport, sqlx::Error> {
        send_daily_broadcast(&self.ctx, today()).await
    }
}

/// One sweep over all opted-in users. A failed delivery is logged and counted,
/// the remaining users are still notified.
pub async fn send_daily_broadcast(
    ctx: &AppContext,
    today: NaiveDate,
) -> Result<BroadcastReport, sqlx::Error> {
    let users = User::find_with_notifications(&ctx.db.pool).await?;
    let mut report = BroadcastReport::default();

    for user in users {
        if notify_user(ctx.notifier.as_ref(), &user, today).await {
            report.sent += 1;
        } else {
            report.failed += 1;
        }
    }

    Ok(report)
}

async fn notify_user(notifier: &dyn Notifier, user: &User, today: NaiveDate) -> bool {
    let days = elapsed_days(user.streak_start_date, today);
    match notifier.notify(user.telegram_id, &replies::holding_on(days)).await {
        Ok(()) => {
            tracing::debug!("Sent daily streak ({} days) to user {}", days, user.telegram_id);
            true
        }
        Err(e) => {
            tracing::error!("Failed to send daily streak to user {}: {}", user.telegram_id, e);
            false
        }
    }
}
