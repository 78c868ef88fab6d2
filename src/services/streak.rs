use chrono::NaiveDate;

use crate::database::{connection::DatabaseManager, models::User};
use crate::utils::datetime::elapsed_days;

/// Days the user has been holding on, or `None` for an unknown user.
pub async fn days_holding(
    db: &DatabaseManager,
    telegram_id: i64,
    today: NaiveDate,
) -> Result<Option<i64>, sqlx::Error> {
    let user = User::find_by_id(&db.pool, telegram_id).await?;
    Ok(user.map(|u| elapsed_days(u.streak_start_date, today)))
}

/// Restarts the streak from `today`. Returns `false` for an unknown user.
pub async fn start_over(
    db: &DatabaseManager,
    telegram_id: i64,
    today: NaiveDate,
) -> Result<bool, sqlx::Error> {
    User::set_streak_start_date(&db.pool, telegram_id, today).await
}
