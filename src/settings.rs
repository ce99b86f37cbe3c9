use crate::common::env::FromEnv;
use std::env;
use std::net::IpAddr;
use std::ops::Deref;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::Level;

pub struct AppSettings {
    pub app_component: String,
    pub level: Level,
    pub app_host: IpAddr,
    pub app_port: u16,

    pub database_url: String,
    pub db_max_connections: usize,
    pub db_wait_timeout: Duration,

    pub storage_url: String,
    pub storage_bucket: String,
    pub storage_api_key: Option<String>,
}

impl AppSettings {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();

        let app_component = env::var("APP_COMPONENT")?;
        let level = Level::from_env("LOG_LEVEL")?;
        let app_host = IpAddr::from_env("APP_HOST")?;
        let app_port = u16::from_env("APP_PORT")?;

        let database_url = env::var("DATABASE_URL")?;
        let db_max_connections = usize::from_env_or("DB_MAX_CONNECTIONS", 5)?;
        let db_wait_timeout_secs = u64::from_env_or("DB_WAIT_TIMEOUT_SECS", 5)?;
        let db_wait_timeout = Duration::from_secs(db_wait_timeout_secs);

        let storage_url = env::var("STORAGE_URL")?;
        let storage_bucket = String::from_env_or("STORAGE_BUCKET", "event-files".to_owned())?;
        let storage_api_key = env::var("STORAGE_API_KEY").ok();

        Ok(AppSettings {
            app_component,
            level,
            app_port,
            app_host,

            database_url,
            db_max_connections,
            db_wait_timeout,

            storage_url,
            storage_bucket,
            storage_api_key,
        })
    }

    pub fn get() -> &'static AppSettings {
        settings()
    }
}

pub fn settings() -> &'static AppSettings {
    static SETTINGS: LazyLock<AppSettings> =
        LazyLock::new(|| AppSettings::load_from_env().expect("Failed to load settings"));
    SETTINGS.deref()
}
