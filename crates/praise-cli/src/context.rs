//! Load-evaluate-mutate-save cycle shared by every stateful command.

use chrono::{DateTime, Utc};
use praise_core::{AppState, Config, CoreError, Event, FileStore, StateStore};

pub struct Context {
    pub config: Config,
    pub state: AppState,
    pub now: DateTime<Utc>,
    store: FileStore,
}

impl Context {
    /// Load config and state, then evaluate the streak against `now`.
    pub fn open(now: DateTime<Utc>) -> Result<Self, CoreError> {
        let config = Config::load_or_default();
        let store = FileStore::open_default()?;
        let mut state = store.load(config.initial_preferences(), now)?;
        let events = state.evaluate(now);
        print_events(&events);
        Ok(Self {
            config,
            state,
            now,
            store,
        })
    }

    pub fn save(&self) -> Result<(), CoreError> {
        self.store.save(&self.state)
    }
}

/// Human-readable line for events worth telling the user about.
pub fn describe(event: &Event) -> Option<String> {
    match event {
        Event::StreakBroken { previous, gap_days, .. } if *previous > 0 => Some(format!(
            "Streak of {previous} ended ({gap_days} days since last check-in)"
        )),
        Event::TimeZoneChanged {
            today_before,
            today_after,
            ..
        } if today_before != today_after => Some(format!(
            "Today is now {today_after} (was {today_before})"
        )),
        Event::SignedUp { username } => Some(format!("Account created, logged in as {username}")),
        Event::LoggedIn { username } => Some(format!("Logged in as {username}")),
        Event::LoggedOut { username } => Some(format!("Logged out {username}")),
        Event::FriendAdded { username } => Some(format!("Added friend {username}")),
        Event::FriendRemoved { username } => Some(format!("Removed friend {username}")),
        Event::FriendsRefreshed { updated } => Some(format!("Refreshed {updated} friend(s)")),
        Event::JournalEntryAdded { kind, id } => Some(format!("Added {kind} entry {id}")),
        Event::JournalEntryDeleted { kind, id } => Some(format!("Deleted {kind} entry {id}")),
        Event::LanguageChanged { language } => Some(format!("Language: {language}")),
        _ => None,
    }
}

pub fn print_events(events: &[Event]) {
    for line in events.iter().filter_map(describe) {
        println!("{line}");
    }
}
