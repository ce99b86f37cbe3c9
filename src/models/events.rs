use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::entities::events::Event as EventEntity;
use crate::models::capabilities::EventCapabilities;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub use crate::entities::events::Round;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl EventStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
        }
    }

    /// The only status this one may move to. `Completed` is terminal.
    pub const fn successor(&self) -> Option<EventStatus> {
        match self {
            EventStatus::Upcoming => Some(EventStatus::Ongoing),
            EventStatus::Ongoing => Some(EventStatus::Completed),
            EventStatus::Completed => None,
        }
    }

    pub fn can_advance_to(&self, target: EventStatus) -> bool {
        self.successor() == Some(target)
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for EventStatus {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "upcoming" => Ok(EventStatus::Upcoming),
            "ongoing" => Ok(EventStatus::Ongoing),
            "completed" => Ok(EventStatus::Completed),
            _ => unexpected(anyhow::anyhow!("invalid event status: {value}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub event_id: i64,
    pub host_id: i64,
    pub name: String,
    pub description: String,
    pub eligibility: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_participants: i64,
    pub participant_count: i64,
    pub status: EventStatus,
    pub rounds: Vec<Round>,
    pub judging_criteria: String,
    pub prizes: String,
    pub judge_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn from_entity(value: EventEntity, judge_ids: Vec<i64>) -> ServiceResult<Self> {
        Ok(Self {
            status: EventStatus::try_from(value.status.as_str())?,
            event_id: value.id,
            host_id: value.host_id,
            name: value.name,
            description: value.description,
            eligibility: value.eligibility,
            start_date: value.start_date,
            end_date: value.end_date,
            max_participants: value.max_participants,
            participant_count: value.participant_count,
            rounds: value.rounds.0,
            judging_criteria: value.judging_criteria,
            prizes: value.prizes,
            judge_ids,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }

    pub fn is_host(&self, user_id: i64) -> bool {
        self.host_id == user_id
    }

    pub fn is_judge(&self, user_id: i64) -> bool {
        self.judge_ids.contains(&user_id)
    }

    pub fn is_full(&self) -> bool {
        self.participant_count >= self.max_participants
    }

    pub fn capabilities_for(&self, user_id: i64, is_participant: bool) -> EventCapabilities {
        let mut capabilities = EventCapabilities::empty();
        capabilities.set(EventCapabilities::Host, self.is_host(user_id));
        capabilities.set(EventCapabilities::Judge, self.is_judge(user_id));
        capabilities.set(EventCapabilities::Participant, is_participant);
        capabilities
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventArgs {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub eligibility: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_participants: i64,
    #[serde(default)]
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub judging_criteria: String,
    #[serde(default)]
    pub prizes: String,
    #[serde(default)]
    pub judge_emails: Vec<String>,
}

impl CreateEventArgs {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::EventsInvalidName);
        }
        if self.end_date <= self.start_date {
            return Err(AppError::EventsInvalidSchedule);
        }
        if self.max_participants < 1 {
            return Err(AppError::EventsInvalidCapacity);
        }
        Ok(())
    }
}

/// Content a host may still change while the event is upcoming.
/// Unset fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventArgs {
    pub description: Option<String>,
    pub eligibility: Option<String>,
    pub rounds: Option<Vec<Round>>,
    pub judging_criteria: Option<String>,
    pub prizes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default = "default_listing_status")]
    pub status: EventStatus,
}

const fn default_listing_status() -> EventStatus {
    EventStatus::Upcoming
}

#[derive(Debug, Deserialize)]
pub struct AdvanceStatusArgs {
    pub status: EventStatus,
}

#[derive(Debug, Deserialize)]
pub struct JoinArgs {
    pub team_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn args() -> CreateEventArgs {
        let start_date = Utc::now();
        CreateEventArgs {
            name: "AI Innovation Challenge".to_owned(),
            description: String::new(),
            eligibility: String::new(),
            start_date,
            end_date: start_date + TimeDelta::days(2),
            max_participants: 100,
            rounds: vec![],
            judging_criteria: String::new(),
            prizes: String::new(),
            judge_emails: vec![],
        }
    }

    #[test]
    fn status_only_moves_forward_one_step() {
        assert!(EventStatus::Upcoming.can_advance_to(EventStatus::Ongoing));
        assert!(EventStatus::Ongoing.can_advance_to(EventStatus::Completed));
        assert!(!EventStatus::Upcoming.can_advance_to(EventStatus::Completed));
        assert!(!EventStatus::Ongoing.can_advance_to(EventStatus::Upcoming));
        assert!(!EventStatus::Completed.can_advance_to(EventStatus::Ongoing));
        assert_eq!(EventStatus::Completed.successor(), None);
    }

    #[test]
    fn status_round_trips_through_storage_text() {
        for status in [
            EventStatus::Upcoming,
            EventStatus::Ongoing,
            EventStatus::Completed,
        ] {
            assert_eq!(EventStatus::try_from(status.as_str()), Ok(status));
        }
        assert_eq!(
            EventStatus::try_from("cancelled"),
            Err(AppError::Unexpected)
        );
    }

    #[test]
    fn validation_rejects_bad_schedule_and_capacity() {
        assert_eq!(args().validate(), Ok(()));

        let mut same_time = args();
        same_time.end_date = same_time.start_date;
        assert_eq!(same_time.validate(), Err(AppError::EventsInvalidSchedule));

        let mut no_capacity = args();
        no_capacity.max_participants = 0;
        assert_eq!(no_capacity.validate(), Err(AppError::EventsInvalidCapacity));

        let mut unnamed = args();
        unnamed.name = "  ".to_owned();
        assert_eq!(unnamed.validate(), Err(AppError::EventsInvalidName));
    }
}
