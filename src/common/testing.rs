use crate::adapters::object_storage::ObjectStorage;
use crate::common::context::Context;
use crate::common::init::run_migrations;
use crate::common::realtime::RealtimeHub;
use crate::models::events::{CreateEventArgs, Event, Round};
use crate::models::sessions::Session;
use crate::usecases::{events, users};
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

/// A fully migrated in-memory database plus in-process collaborators.
pub struct TestContext {
    pub db: Pool<Sqlite>,
    pub realtime: RealtimeHub,
    pub storage: MemoryStorage,
    file: Option<PathBuf>,
}

impl TestContext {
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        // One connection that never recycles, or the in-memory database vanishes.
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .unwrap();
        run_migrations(&db).await.unwrap();
        Self::with_db(db, None)
    }

    /// A WAL database file shared by several connections, so statements from
    /// concurrent tasks genuinely interleave. The file is removed on drop.
    pub async fn file_backed(max_connections: u32) -> Self {
        let file = std::env::temp_dir().join(format!("innovatehub-{}.db", uuid::Uuid::new_v4()));
        let options = SqliteConnectOptions::new()
            .filename(&file)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30));
        let db = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .unwrap();
        run_migrations(&db).await.unwrap();
        Self::with_db(db, Some(file))
    }

    fn with_db(db: Pool<Sqlite>, file: Option<PathBuf>) -> Self {
        Self {
            db,
            realtime: RealtimeHub::new(),
            storage: MemoryStorage::default(),
            file,
        }
    }

    pub async fn user(&self, name: &str) -> Session {
        let email = format!("{}@example.com", name.to_lowercase());
        users::signup(self, name, &email, "correct horse battery")
            .await
            .unwrap()
    }

    pub async fn event(&self, host: &Session, judges: &[&Session], max_participants: i64) -> Event {
        let args = event_args(
            judges.iter().map(|judge| judge.email.clone()).collect(),
            max_participants,
        );
        events::create(self, host, args).await.unwrap()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let Some(file) = &self.file else {
            return;
        };
        for suffix in ["", "-wal", "-shm"] {
            let mut path = file.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

impl Context for TestContext {
    fn db(&self) -> &Pool<Sqlite> {
        &self.db
    }

    fn realtime(&self) -> &RealtimeHub {
        &self.realtime
    }

    fn storage(&self) -> &dyn ObjectStorage {
        &self.storage
    }
}

pub fn event_args(judge_emails: Vec<String>, max_participants: i64) -> CreateEventArgs {
    let start_date = Utc::now() + TimeDelta::days(1);
    CreateEventArgs {
        name: "AI Innovation Challenge".to_owned(),
        description: "Build something clever in 48 hours.".to_owned(),
        eligibility: "Students".to_owned(),
        start_date,
        end_date: start_date + TimeDelta::days(2),
        max_participants,
        rounds: vec![Round {
            name: "Final".to_owned(),
            description: "Demo day".to_owned(),
        }],
        judging_criteria: "Innovation".to_owned(),
        prizes: "$1000".to_owned(),
        judge_emails,
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    pub uploads: Mutex<Vec<(String, String, usize)>>,
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, path: &str, content_type: &str, data: Vec<u8>) -> anyhow::Result<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((path.to_owned(), content_type.to_owned(), data.len()));
        Ok(format!("memory://{path}"))
    }
}
