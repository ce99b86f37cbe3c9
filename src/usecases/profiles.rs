use crate::common::context::Context;
use crate::common::error::ServiceResult;
use crate::models::capabilities::EventCapabilities;
use crate::models::users::Profile;
use crate::repositories::{events, participations};
use crate::usecases::users;

pub async fn fetch_one<C: Context>(ctx: &C, user_id: i64) -> ServiceResult<Profile> {
    let user = users::fetch_one(ctx, user_id).await?;
    let events_participated = participations::count_by_user(ctx, user_id).await?;
    let events_hosted = events::count_by_host(ctx, user_id).await?;
    let events_judged = events::count_by_judge(ctx, user_id).await?;

    let mut roles = EventCapabilities::empty();
    roles.set(EventCapabilities::Participant, events_participated > 0);
    roles.set(EventCapabilities::Host, events_hosted > 0);
    roles.set(EventCapabilities::Judge, events_judged > 0);

    Ok(Profile {
        user,
        roles,
        events_participated,
        events_hosted,
        events_judged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::TestContext;
    use crate::usecases::events;

    #[tokio::test]
    async fn roles_are_the_union_over_events() {
        let ctx = TestContext::new().await;
        let host = ctx.user("Hopper").await;
        let judge = ctx.user("Grace").await;
        let event = ctx.event(&host, &[&judge], 10).await;
        let other = ctx.event(&judge, &[], 10).await;
        events::join(&ctx, &host, other.event_id, "Hosts Abroad")
            .await
            .unwrap();

        let profile = fetch_one(&ctx, host.user_id).await.unwrap();
        assert_eq!(profile.events_hosted, 1);
        assert_eq!(profile.events_participated, 1);
        assert_eq!(profile.events_judged, 0);
        assert_eq!(
            profile.roles,
            EventCapabilities::Host | EventCapabilities::Participant
        );

        let profile = fetch_one(&ctx, judge.user_id).await.unwrap();
        assert!(profile.roles.is_judge());
        assert!(profile.roles.is_host());
        assert!(!profile.roles.is_participant());
        assert_eq!(event.judge_ids, vec![judge.user_id]);
    }
}
