pub mod tasks;

use crate::common::init;
use crate::cron_tasks;
use crate::settings::AppSettings;
use tasks::start_due_events::start_due_events;

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let ctx = init::initialize_state(settings).await?;
    cron_tasks! {
        &ctx,
        start_due_events,
    }
    Ok(())
}
