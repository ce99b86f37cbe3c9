use crate::adapters::object_storage::ObjectStorage;
use crate::common::realtime::RealtimeHub;
use sqlx::{Pool, Sqlite};

pub trait Context: Sync + Send {
    fn db(&self) -> &Pool<Sqlite>;
    fn realtime(&self) -> &RealtimeHub;
    fn storage(&self) -> &dyn ObjectStorage;
}
