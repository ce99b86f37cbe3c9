pub mod lifecycle_cron;
pub mod tasks;
