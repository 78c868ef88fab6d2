use anyhow::{anyhow, Result};
use quit_streak_bot::config::Config;
use quit_streak_bot::database::{connection::DatabaseManager, models::User};
use std::env;
use std::io;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize basic logging for the migration
    env_logger::init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "reset" => reset_database().await,
        "notifications" => toggle_notifications(&args[2..]).await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

async fn connect() -> Result<(Config, DatabaseManager)> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    println!("📊 Database URL: {}", mask_url(&config.database_url));

    let db_manager = DatabaseManager::new(&config.database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    Ok((config, db_manager))
}

async fn run_migrations() -> Result<()> {
    println!("🔧 Quit Streak Bot - Database Migration Tool");
    println!("=============================================");

    let (_config, db_manager) = connect().await?;

    println!("🚀 Running database migrations...");

    match db_manager.run_migrations().await {
        Ok(_) => {
            println!("✅ Migrations completed successfully!");
        }
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let (_config, db_manager) = connect().await?;

    match check_tables(&db_manager).await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for table in tables {
                println!("  • {table}");
            }
            match User::count(&db_manager.pool).await {
                Ok(count) => println!("👥 Registered users: {count}"),
                Err(e) => println!("⚠️  Could not count users: {e}"),
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'migrate up' to create the schema");
        }
    }

    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL data in the database!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // For SQLite, we can just delete the file
    if config.database_url.starts_with("sqlite:") {
        let db_path = sqlite_path(&config.database_url);
        if Path::new(db_path).exists() {
            std::fs::remove_file(db_path)?;
            println!("🗑️  Deleted database file: {db_path}");
        }
    } else {
        return Err(anyhow!("Reset is only supported for SQLite databases"));
    }

    // Run migrations to recreate the schema
    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");

    Ok(())
}

async fn toggle_notifications(args: &[String]) -> Result<()> {
    let (telegram_id, enabled) = parse_notification_args(args)?;

    let (_config, db_manager) = connect().await?;

    if User::set_notifications_enabled(&db_manager.pool, telegram_id, enabled).await? {
        let state = if enabled { "enabled" } else { "disabled" };
        println!("✅ Daily notifications {state} for user {telegram_id}");
        Ok(())
    } else {
        Err(anyhow!("No registered user with id {telegram_id}"))
    }
}

fn parse_notification_args(args: &[String]) -> Result<(i64, bool)> {
    let [id, flag] = args else {
        return Err(anyhow!("Usage: migrate notifications <telegram_id> <on|off>"));
    };

    let telegram_id = id
        .parse()
        .map_err(|_| anyhow!("Invalid telegram id: {id}"))?;
    let enabled = match flag.to_lowercase().as_str() {
        "on" | "true" | "1" => true,
        "off" | "false" | "0" => false,
        other => return Err(anyhow!("Expected 'on' or 'off', got '{other}'")),
    };

    Ok((telegram_id, enabled))
}

async fn check_tables(db_manager: &DatabaseManager) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name",
    )
    .fetch_all(&db_manager.pool)
    .await?;

    Ok(tables)
}

fn sqlite_path(url: &str) -> &str {
    let path = url.strip_prefix("sqlite:").unwrap_or(url);
    path.strip_prefix("//").unwrap_or(path)
}

fn mask_url(url: &str) -> String {
    // Simple URL masking for security (don't show full paths in production)
    if url.starts_with("sqlite:") {
        if let Some(filename) = Path::new(sqlite_path(url)).file_name() {
            format!("sqlite:.../{}", filename.to_string_lossy())
        } else {
            url.to_string()
        }
    } else {
        url.to_string()
    }
}

fn print_help() {
    println!("🔥 Quit Streak Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up                          Run database migrations (default)");
    println!("    check                                Check database connection and schema");
    println!("    reset                                Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    notifications <telegram_id> <on|off> Toggle a user's daily notification");
    println!("    help                                 Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: sqlite:./data/streaks.db)");
    println!();
    println!("EXAMPLES:");
    println!("    migrate                          # Run migrations");
    println!("    migrate check                    # Check database status");
    println!("    migrate notifications 12345 off  # Stop daily messages for a user");
    println!();
}
