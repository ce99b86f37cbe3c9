use crate::common::context::Context;
use crate::common::error::ServiceResult;
use crate::usecases::events;
use tracing::info;

pub async fn start_due_events<C: Context>(ctx: &C) -> ServiceResult<usize> {
    let started = events::start_due(ctx).await?;
    if started > 0 {
        info!(started, "Started due events");
    }
    Ok(started)
}
