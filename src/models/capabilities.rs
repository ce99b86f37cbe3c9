use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// What a user may do within one event. A user's profile role set is the
    /// union of their capabilities over every event.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct EventCapabilities: u8 {
        const Participant = 1 << 0;
        const Host = 1 << 1;
        const Judge = 1 << 2;
    }
}

impl EventCapabilities {
    pub fn is_participant(&self) -> bool {
        self.contains(EventCapabilities::Participant)
    }

    pub fn is_host(&self) -> bool {
        self.contains(EventCapabilities::Host)
    }

    pub fn is_judge(&self) -> bool {
        self.contains(EventCapabilities::Judge)
    }

    pub fn can_view_submissions(&self) -> bool {
        self.intersects(EventCapabilities::Host | EventCapabilities::Judge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_not_mutually_exclusive() {
        let caps = EventCapabilities::Participant | EventCapabilities::Judge;
        assert!(caps.is_participant());
        assert!(caps.is_judge());
        assert!(!caps.is_host());
        assert!(caps.can_view_submissions());
        assert!(!EventCapabilities::Participant.can_view_submissions());
    }
}
