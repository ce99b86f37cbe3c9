use crate::entities::participations::Participation as ParticipationEntity;
use crate::models::events::Event;
use crate::models::submissions::Submission;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Participation {
    pub participation_id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub team_name: String,
    pub joined_at: DateTime<Utc>,
}

impl From<ParticipationEntity> for Participation {
    fn from(value: ParticipationEntity) -> Self {
        Self {
            participation_id: value.id,
            event_id: value.event_id,
            user_id: value.user_id,
            team_name: value.team_name,
            joined_at: value.joined_at,
        }
    }
}

/// A participation as its owner sees it: the event and the team's submission, if any.
#[derive(Debug, Serialize)]
pub struct ParticipationOverview {
    #[serde(flatten)]
    pub participation: Participation,
    pub event: Event,
    pub submission: Option<Submission>,
}
