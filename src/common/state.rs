use crate::adapters::object_storage::ObjectStorage;
use crate::common::context::Context;
use crate::common::realtime::RealtimeHub;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub realtime: RealtimeHub,
    pub storage: Arc<dyn ObjectStorage>,
}

impl Context for AppState {
    fn db(&self) -> &Pool<Sqlite> {
        &self.db
    }

    fn realtime(&self) -> &RealtimeHub {
        &self.realtime
    }

    fn storage(&self) -> &dyn ObjectStorage {
        self.storage.as_ref()
    }
}
