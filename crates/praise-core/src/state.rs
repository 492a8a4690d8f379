//! The application state document and its update functions.
//!
//! `AppState` is the single value that front-ends load, mutate through the
//! methods below, and save. Every mutation takes the current instant
//! explicitly and returns the events it produced.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::{AccountDirectory, Profile};
use crate::clock::TimeZoneSetting;
use crate::error::{AuthError, Result};
use crate::events::Event;
use crate::friends::Friend;
use crate::i18n::Language;
use crate::journal::{JournalEntry, JournalKind};
use crate::praise::{pick_phrase, Praise};
use crate::streak::{CheckInOutcome, Evaluation, FireTier};

/// Current layout version of the persisted document.
pub const STATE_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub timezone: TimeZoneSetting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub version: u32,
    #[serde(default)]
    pub preferences: Preferences,
    /// Profile used while nobody is logged in.
    #[serde(default)]
    pub guest: Profile,
    #[serde(default)]
    pub accounts: AccountDirectory,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub last_phrase: Option<usize>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

/// Snapshot of what the main screen shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub user: Option<String>,
    pub language: Language,
    pub timezone: TimeZoneSetting,
    pub today: NaiveDate,
    pub current_streak: u32,
    pub best_streak: u32,
    pub checked_in_today: bool,
    pub total_days: usize,
    pub fire: FireTier,
    pub status_text: String,
    pub streak_text: String,
    pub best_text: String,
}

impl AppState {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            version: STATE_VERSION,
            preferences,
            guest: Profile::default(),
            accounts: AccountDirectory::default(),
            session: None,
            last_phrase: None,
        }
    }

    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.preferences.timezone.today(now)
    }

    /// The logged-in user, if the session still points at a real account.
    pub fn current_user(&self) -> Option<&str> {
        self.session
            .as_deref()
            .filter(|name| self.accounts.contains(name))
    }

    fn require_user(&self) -> Result<String, AuthError> {
        self.current_user()
            .map(str::to_string)
            .ok_or(AuthError::NotLoggedIn)
    }

    pub fn active_profile(&self) -> &Profile {
        self.current_user()
            .and_then(|name| self.accounts.get(name))
            .map(|account| &account.profile)
            .unwrap_or(&self.guest)
    }

    pub fn active_profile_mut(&mut self) -> &mut Profile {
        if let Some(name) = self.session.clone() {
            if let Some(account) = self.accounts.get_mut(&name) {
                return &mut account.profile;
            }
        }
        &mut self.guest
    }

    /// Re-derive today's state for the active profile. Run on every load.
    pub fn evaluate(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let today = self.today(now);
        let evaluation = self.active_profile_mut().streak.evaluate(today);
        tracing::debug!(?evaluation, %today, "streak evaluated");
        match evaluation {
            Evaluation::Broken { previous, gap_days } => vec![Event::StreakBroken {
                previous,
                gap_days,
                day: today,
            }],
            _ => Vec::new(),
        }
    }

    pub fn check_in(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = self.evaluate(now);
        let today = self.today(now);
        let streak = &mut self.active_profile_mut().streak;
        match streak.check_in(today) {
            CheckInOutcome::AlreadyCheckedIn => events.push(Event::AlreadyCheckedIn {
                day: today,
                streak: streak.current_streak,
            }),
            CheckInOutcome::CheckedIn {
                streak: count,
                new_best,
                milestone,
            } => {
                events.push(Event::CheckedIn {
                    day: today,
                    streak: count,
                    best: streak.best_streak,
                    new_best,
                });
                if let Some(milestone) = milestone {
                    events.push(Event::MilestoneReached {
                        milestone,
                        days: milestone.days(),
                        at: now,
                    });
                }
            }
        }
        events
    }

    /// The primary button: check in, then pick praise for the front-end.
    pub fn press<R: Rng + ?Sized>(
        &mut self,
        now: DateTime<Utc>,
        phrases: &[String],
        haptics: bool,
        rng: &mut R,
    ) -> (Vec<Event>, Praise) {
        let mut events = self.check_in(now);
        let language = self.preferences.language;

        let milestone = events.iter().find_map(|e| match e {
            Event::MilestoneReached { milestone, .. } => {
                Some((*milestone, language.milestone(*milestone).to_string()))
            }
            _ => None,
        });

        let phrase = pick_phrase(phrases.len(), self.last_phrase, rng).map(|index| {
            self.last_phrase = Some(index);
            events.push(Event::PhrasePicked {
                index,
                phrase: phrases[index].clone(),
            });
            phrases[index].clone()
        });

        (
            events,
            Praise {
                phrase,
                haptics,
                milestone,
            },
        )
    }

    pub fn set_language(&mut self, language: Language) -> Vec<Event> {
        self.preferences.language = language;
        vec![Event::LanguageChanged { language }]
    }

    pub fn toggle_language(&mut self) -> Vec<Event> {
        self.set_language(self.preferences.language.toggled())
    }

    /// Switch timezone and re-evaluate under the new zone.
    ///
    /// History is left untouched; only "today" moves. A streak that was fine
    /// before may break (or a day may open up again) as a result.
    pub fn set_timezone(&mut self, timezone: TimeZoneSetting, now: DateTime<Utc>) -> Vec<Event> {
        let from = self.preferences.timezone;
        let today_before = self.today(now);
        self.preferences.timezone = timezone;
        let today_after = self.today(now);
        if today_before != today_after {
            tracing::info!(%from, to = %timezone, %today_before, %today_after, "timezone change moved today");
        }

        let mut events = vec![Event::TimeZoneChanged {
            from,
            to: timezone,
            today_before,
            today_after,
        }];
        events.extend(self.evaluate(now));
        events
    }

    pub fn add_journal(&mut self, kind: JournalKind, text: &str, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let entry = self.active_profile_mut().journals.add(kind, text, now)?;
        Ok(vec![Event::JournalEntryAdded { kind, id: entry.id }])
    }

    pub fn delete_journal(&mut self, kind: JournalKind, id: Uuid) -> Result<Vec<Event>> {
        let entry = self.active_profile_mut().journals.delete(kind, id)?;
        Ok(vec![Event::JournalEntryDeleted { kind, id: entry.id }])
    }

    pub fn journal(&self, kind: JournalKind) -> Vec<&JournalEntry> {
        self.active_profile().journals.list(kind)
    }

    /// Create an account and log into it.
    ///
    /// With `adopt_guest` the guest profile moves into the new account and
    /// the guest starts over; otherwise the account starts fresh.
    pub fn signup(
        &mut self,
        username: &str,
        password: &str,
        email: &str,
        adopt_guest: bool,
        now: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        let profile = if adopt_guest {
            self.guest.clone()
        } else {
            Profile::default()
        };
        let username = self
            .accounts
            .signup(username, password, email, profile, now)?
            .username
            .clone();
        if adopt_guest {
            self.guest = Profile::default();
        }
        self.session = Some(username.clone());

        let mut events = vec![Event::SignedUp { username }];
        events.extend(self.evaluate(now));
        Ok(events)
    }

    pub fn login(&mut self, username: &str, password: &str, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let username = self.accounts.authenticate(username, password)?.username.clone();
        tracing::info!(%username, "logged in");
        self.session = Some(username.clone());

        let mut events = vec![Event::LoggedIn { username }];
        events.extend(self.evaluate(now));
        Ok(events)
    }

    pub fn logout(&mut self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let username = self.require_user()?;
        self.session = None;
        tracing::info!(%username, "logged out");

        let mut events = vec![Event::LoggedOut { username }];
        events.extend(self.evaluate(now));
        Ok(events)
    }

    pub fn add_friend(&mut self, target: &str, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let owner = self.require_user()?;
        let friend = self.accounts.add_friend(&owner, target, now)?;
        Ok(vec![Event::FriendAdded {
            username: friend.username,
        }])
    }

    pub fn remove_friend(&mut self, target: &str) -> Result<Vec<Event>> {
        let owner = self.require_user()?;
        let friend = self.accounts.remove_friend(&owner, target)?;
        Ok(vec![Event::FriendRemoved {
            username: friend.username,
        }])
    }

    pub fn refresh_friends(&mut self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let owner = self.require_user()?;
        let today = self.today(now);
        let updated = self.accounts.refresh_friends(&owner, today, now)?;
        Ok(vec![Event::FriendsRefreshed { updated }])
    }

    pub fn friends(&self) -> Result<Vec<Friend>> {
        let owner = self.require_user()?;
        Ok(self.accounts.friends_of(&owner)?)
    }

    pub fn status(&self, now: DateTime<Utc>) -> StatusReport {
        let language = self.preferences.language;
        let streak = &self.active_profile().streak;
        StatusReport {
            user: self.current_user().map(str::to_string),
            language,
            timezone: self.preferences.timezone,
            today: self.today(now),
            current_streak: streak.current_streak,
            best_streak: streak.best_streak,
            checked_in_today: streak.checked_in_today,
            total_days: streak.total_days(),
            fire: streak.fire(),
            status_text: if streak.checked_in_today {
                language.checked_in().to_string()
            } else {
                language.click_to_check_in().to_string()
            },
            streak_text: language.streak_line(streak.current_streak),
            best_text: language.best_line(streak.best_streak),
        }
    }
}
