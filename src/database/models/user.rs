use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::logging::log_database_operation;

const USER_COLUMNS: &str = "telegram_id, username, first_name, last_name, streak_start_date, weakness_title, notifications_enabled, created_at";

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub streak_start_date: NaiveDate,
    pub weakness_title: Option<String>,
    pub notifications_enabled: bool,
    pub created_at: String,
}

/// Profile fields copied from the Telegram account at registration time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Outcome of [`User::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created(User),
    AlreadyRegistered(User),
}

impl Registration {
    pub fn user(&self) -> &User {
        match self {
            Registration::Created(user) | Registration::AlreadyRegistered(user) => user,
        }
    }
}

impl User {
    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE telegram_id = ?"
        ))
        .bind(telegram_id)
        .fetch_optional(pool)
        .await
    }

    /// Looks the user up and creates the record if it is missing, inside one
    /// transaction. A new record starts its streak on `today` with no title.
    pub async fn register(
        pool: &sqlx::SqlitePool,
        profile: &UserProfile,
        today: NaiveDate,
    ) -> Result<Registration, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE telegram_id = ?"
        ))
        .bind(profile.telegram_id)
        .fetch_optional(&mut tx)
        .await?;

        if let Some(user) = existing {
            tx.commit().await?;
            return Ok(Registration::AlreadyRegistered(user));
        }

        let created_at = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO users (telegram_id, username, first_name, last_name, streak_start_date, notifications_enabled, created_at)
            VALUES (?, ?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(profile.telegram_id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(today)
        .bind(&created_at)
        .execute(&mut tx)
        .await?;

        tx.commit().await?;
        log_database_operation("INSERT", "users", Some(&format!("telegram_id={}", profile.telegram_id)));

        Ok(Registration::Created(User {
            telegram_id: profile.telegram_id,
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            streak_start_date: today,
            weakness_title: None,
            notifications_enabled: true,
            created_at,
        }))
    }

    /// Returns `false` when no such user exists.
    pub async fn set_weakness_title(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
        title: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET weakness_title = ? WHERE telegram_id = ?")
            .bind(title)
            .bind(telegram_id)
            .execute(pool)
            .await?;

        log_database_operation("UPDATE weakness_title", "users", Some(&format!("telegram_id={telegram_id}")));
        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` when no such user exists.
    pub async fn set_streak_start_date(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET streak_start_date = ? WHERE telegram_id = ?")
            .bind(date)
            .bind(telegram_id)
            .execute(pool)
            .await?;

        log_database_operation(
            "UPDATE streak_start_date",
            "users",
            Some(&format!("telegram_id={telegram_id} date={date}")),
        );
        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` when no such user exists.
    pub async fn set_notifications_enabled(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
        enabled: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET notifications_enabled = ? WHERE telegram_id = ?")
            .bind(enabled)
            .bind(telegram_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_with_notifications(
        pool: &sqlx::SqlitePool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE notifications_enabled = 1 ORDER BY telegram_id"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }

    /// Name used when greeting the user back.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("Incognito")
    }
}
