use anyhow::Result;
use chrono::{Duration, NaiveDate};
use quit_streak_bot::database::{connection::DatabaseManager, models::*};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn profile(telegram_id: i64, username: Option<&str>) -> UserProfile {
    UserProfile {
        telegram_id,
        username: username.map(str::to_string),
        first_name: Some("Test".to_string()),
        last_name: None,
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_register_creates_user_with_defaults() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let today = day(2024, 3, 10);

    let registration = User::register(&db.pool, &profile(12345, Some("quitter")), today).await?;
    let user = match registration {
        Registration::Created(user) => user,
        other => panic!("expected a new user, got {other:?}"),
    };

    assert_eq!(user.telegram_id, 12345);
    assert_eq!(user.streak_start_date, today);
    assert_eq!(user.weakness_title, None);
    assert!(user.notifications_enabled);

    let stored = User::find_by_id(&db.pool, 12345).await?.unwrap();
    assert_eq!(stored, user);
    assert_eq!(stored.username.as_deref(), Some("quitter"));
    assert_eq!(stored.first_name.as_deref(), Some("Test"));
    assert_eq!(stored.last_name, None);

    Ok(())
}

#[tokio::test]
async fn test_register_twice_keeps_single_record() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let first_day = day(2024, 3, 1);

    User::register(&db.pool, &profile(1, Some("quitter")), first_day).await?;
    let second = User::register(&db.pool, &profile(1, Some("renamed")), first_day + Duration::days(3)).await?;

    match &second {
        Registration::AlreadyRegistered(user) => {
            // Existing records are returned untouched
            assert_eq!(user.streak_start_date, first_day);
            assert_eq!(user.username.as_deref(), Some("quitter"));
        }
        other => panic!("expected an existing user, got {other:?}"),
    }
    assert_eq!(second.user().telegram_id, 1);
    assert_eq!(User::count(&db.pool).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_user_not_found() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    assert!(User::find_by_id(&db.pool, 99999).await?.is_none());
    assert!(!User::set_weakness_title(&db.pool, 99999, "Smoking").await?);
    assert!(!User::set_streak_start_date(&db.pool, 99999, day(2024, 1, 1)).await?);
    assert!(!User::set_notifications_enabled(&db.pool, 99999, false).await?);

    Ok(())
}

#[tokio::test]
async fn test_updates_touch_only_their_field() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let today = day(2024, 3, 10);
    User::register(&db.pool, &profile(7, None), today).await?;

    assert!(User::set_weakness_title(&db.pool, 7, "Sugar").await?);
    let user = User::find_by_id(&db.pool, 7).await?.unwrap();
    assert_eq!(user.weakness_title.as_deref(), Some("Sugar"));
    assert_eq!(user.streak_start_date, today);

    assert!(User::set_streak_start_date(&db.pool, 7, day(2024, 2, 29)).await?);
    let user = User::find_by_id(&db.pool, 7).await?.unwrap();
    assert_eq!(user.streak_start_date, day(2024, 2, 29));
    assert_eq!(user.weakness_title.as_deref(), Some("Sugar"));

    Ok(())
}

#[tokio::test]
async fn test_find_with_notifications_filters_disabled_users() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let today = day(2024, 3, 10);

    for id in [3, 1, 2] {
        User::register(&db.pool, &profile(id, None), today).await?;
    }
    assert!(User::set_notifications_enabled(&db.pool, 2, false).await?);

    let ids: Vec<i64> = User::find_with_notifications(&db.pool)
        .await?
        .into_iter()
        .map(|u| u.telegram_id)
        .collect();

    assert_eq!(ids, vec![1, 3]);

    Ok(())
}

#[tokio::test]
async fn test_display_name_falls_back_to_incognito() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let today = day(2024, 3, 10);

    let named = User::register(&db.pool, &profile(1, Some("quitter")), today).await?;
    let anonymous = User::register(&db.pool, &profile(2, None), today).await?;

    assert_eq!(named.user().display_name(), "quitter");
    assert_eq!(anonymous.user().display_name(), "Incognito");

    Ok(())
}

#[tokio::test]
async fn test_database_created_in_missing_directory() -> Result<()> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("nested").join("data").join("streaks.db");
    let database_url = format!("sqlite://{}", db_path.display());

    let db = DatabaseManager::new(&database_url).await?;
    db.run_migrations().await?;

    assert!(db_path.exists());
    assert_eq!(User::count(&db.pool).await?, 0);

    Ok(())
}
