use crate::adapters::object_storage::HttpObjectStorage;
use crate::common::realtime::RealtimeHub;
use crate::common::state::AppState;
use crate::settings::AppSettings;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

pub fn initialize_logging(settings: &AppSettings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.level)
        .with_timer(tracing_subscriber::fmt::time())
        .with_level(true)
        .compact()
        .init();
}

pub async fn initialize_state(settings: &AppSettings) -> anyhow::Result<AppState> {
    let db = initialize_db(settings).await?;
    run_migrations(&db).await?;
    let storage = HttpObjectStorage::new(
        &settings.storage_url,
        &settings.storage_bucket,
        settings.storage_api_key.clone(),
    );
    Ok(AppState {
        db,
        realtime: RealtimeHub::new(),
        storage: Arc::new(storage),
    })
}

pub async fn initialize_db(settings: &AppSettings) -> anyhow::Result<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(&settings.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(settings.db_wait_timeout);
    let db = SqlitePoolOptions::new()
        .acquire_timeout(settings.db_wait_timeout)
        .max_connections(settings.db_max_connections as _)
        .connect_with(options)
        .await?;
    Ok(db)
}

pub async fn run_migrations(db: &Pool<Sqlite>) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(db).await?;
    info!("Database migrations complete");
    Ok(())
}
