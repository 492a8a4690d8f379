use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::TimeZoneSetting;
use crate::i18n::Language;
use crate::journal::JournalKind;
use crate::streak::Milestone;

/// Every state change in the system produces an Event.
/// Front-ends render them; the CLI prints them with `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CheckedIn {
        day: NaiveDate,
        streak: u32,
        best: u32,
        new_best: bool,
    },
    AlreadyCheckedIn {
        day: NaiveDate,
        streak: u32,
    },
    MilestoneReached {
        milestone: Milestone,
        days: u32,
        at: DateTime<Utc>,
    },
    StreakBroken {
        previous: u32,
        gap_days: i64,
        day: NaiveDate,
    },
    PhrasePicked {
        index: usize,
        phrase: String,
    },
    LanguageChanged {
        language: Language,
    },
    /// Today may resolve differently under the new zone.
    TimeZoneChanged {
        from: TimeZoneSetting,
        to: TimeZoneSetting,
        today_before: NaiveDate,
        today_after: NaiveDate,
    },
    JournalEntryAdded {
        kind: JournalKind,
        id: uuid::Uuid,
    },
    JournalEntryDeleted {
        kind: JournalKind,
        id: uuid::Uuid,
    },
    SignedUp {
        username: String,
    },
    LoggedIn {
        username: String,
    },
    LoggedOut {
        username: String,
    },
    FriendAdded {
        username: String,
    },
    FriendRemoved {
        username: String,
    },
    FriendsRefreshed {
        updated: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let ev = Event::FriendAdded {
            username: "bob".into(),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "FriendAdded");
        assert_eq!(json["username"], "bob");
    }
}
