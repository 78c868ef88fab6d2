use anyhow::Result;
use chrono::{Duration, NaiveDate};
use quit_streak_bot::bot::dialogue::{Input, RegistrationState};
use quit_streak_bot::bot::replies;
use quit_streak_bot::database::{connection::DatabaseManager, models::*};
use quit_streak_bot::services::registration::{advance, Step};
use quit_streak_bot::utils::feedback::ReplyKeyboard;
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn quitter() -> UserProfile {
    UserProfile {
        telegram_id: 555,
        username: Some("quitter".to_string()),
        first_name: Some("Quinn".to_string()),
        last_name: Some("Itter".to_string()),
    }
}

fn texts(step: &Step) -> Vec<&str> {
    step.replies.iter().map(|r| r.text.as_str()).collect()
}

async fn step(
    db: &DatabaseManager,
    state: &RegistrationState,
    input: Input,
) -> Result<Step> {
    Ok(advance(db, &quitter(), state, input, today()).await?)
}

#[tokio::test]
async fn test_full_registration_with_date() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let started = step(&db, &RegistrationState::Done, Input::Start).await?;
    assert_eq!(started.next, RegistrationState::CollectingTitle);
    assert_eq!(texts(&started), vec![replies::REGISTERED, replies::ASK_TITLE]);
    assert_eq!(started.replies[1].keyboard, ReplyKeyboard::Cancel);

    let user = User::find_by_id(&db.pool, 555).await?.unwrap();
    assert_eq!(user.streak_start_date, today());
    assert_eq!(user.weakness_title, None);

    let titled = step(&db, &started.next, Input::Text("Smoking".to_string())).await?;
    assert_eq!(titled.next, RegistrationState::CollectingDate);
    assert_eq!(texts(&titled), vec![replies::ASK_START_DATE]);
    assert_eq!(titled.replies[0].keyboard, ReplyKeyboard::Skip);
    let user = User::find_by_id(&db.pool, 555).await?.unwrap();
    assert_eq!(user.weakness_title.as_deref(), Some("Smoking"));

    let dated = step(&db, &titled.next, Input::Text("01/03/2024".to_string())).await?;
    assert_eq!(dated.next, RegistrationState::Done);
    assert_eq!(texts(&dated), vec![replies::WEAKNESS_CREATED]);
    assert_eq!(dated.replies[0].keyboard, ReplyKeyboard::Remove);

    let user = User::find_by_id(&db.pool, 555).await?.unwrap();
    assert_eq!(user.streak_start_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

    Ok(())
}

#[tokio::test]
async fn test_skip_keeps_registration_date() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let started = step(&db, &RegistrationState::Done, Input::Start).await?;
    let titled = step(&db, &started.next, Input::Text("Coffee".to_string())).await?;
    let skipped = step(&db, &titled.next, Input::Skip).await?;

    assert_eq!(skipped.next, RegistrationState::Done);
    assert_eq!(texts(&skipped), vec![replies::START_DATE_KEPT]);
    let user = User::find_by_id(&db.pool, 555).await?.unwrap();
    assert_eq!(user.streak_start_date, today());
    assert_eq!(user.weakness_title.as_deref(), Some("Coffee"));

    Ok(())
}

#[tokio::test]
async fn test_start_again_greets_existing_user() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    step(&db, &RegistrationState::Done, Input::Start).await?;
    let again = step(&db, &RegistrationState::Done, Input::Start).await?;

    assert_eq!(again.next, RegistrationState::CollectingTitle);
    assert_eq!(again.replies[0].text, replies::already_registered("quitter"));
    assert_eq!(User::count(&db.pool).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_cancel_leaves_record_untouched() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let start_date = today() - Duration::days(20);

    User::register(&db.pool, &quitter(), start_date).await?;
    User::set_weakness_title(&db.pool, 555, "Gambling").await?;

    for state in [RegistrationState::CollectingTitle, RegistrationState::CollectingDate] {
        let cancelled = step(&db, &state, Input::Cancel).await?;
        assert_eq!(cancelled.next, RegistrationState::Done);
        assert_eq!(texts(&cancelled), vec![replies::FAREWELL]);

        let user = User::find_by_id(&db.pool, 555).await?.unwrap();
        assert_eq!(user.weakness_title.as_deref(), Some("Gambling"));
        assert_eq!(user.streak_start_date, start_date);
    }

    Ok(())
}

#[tokio::test]
async fn test_invalid_date_keeps_asking() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    User::register(&db.pool, &quitter(), today()).await?;

    let rejected = step(&db, &RegistrationState::CollectingDate, Input::Text("30/02/2024".to_string())).await?;
    assert_eq!(rejected.next, RegistrationState::CollectingDate);
    assert_eq!(rejected.replies.len(), 1);
    assert_eq!(rejected.replies[0].keyboard, ReplyKeyboard::Skip);

    let ignored = step(&db, &RegistrationState::CollectingDate, Input::Text("last week".to_string())).await?;
    assert_eq!(ignored.next, RegistrationState::CollectingDate);
    assert!(ignored.replies.is_empty());

    let user = User::find_by_id(&db.pool, 555).await?.unwrap();
    assert_eq!(user.streak_start_date, today());

    Ok(())
}

#[tokio::test]
async fn test_missing_record_ends_conversation() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let title = step(&db, &RegistrationState::CollectingTitle, Input::Text("Sugar".to_string())).await?;
    assert_eq!(title.next, RegistrationState::Done);
    assert_eq!(texts(&title), vec![replies::NOT_REGISTERED]);

    let date = step(&db, &RegistrationState::CollectingDate, Input::Text("01/03/2024".to_string())).await?;
    assert_eq!(date.next, RegistrationState::Done);
    assert_eq!(texts(&date), vec![replies::NOT_REGISTERED]);

    assert_eq!(User::count(&db.pool).await?, 0);

    Ok(())
}
