//! State document migrations.
//!
//! Version 1 is the flat key/value layout the browser widget kept in local
//! storage: one string per key, some of them JSON-encoded, with guest data and
//! per-account data under parallel keys. Version 2 is the single document
//! keyed by account identity (`AppState`).
//!
//! A document without a `version` field is treated as version 1.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::account::{AccountDirectory, PasswordHash, Profile, UserAccount};
use crate::clock::{parse_day, TimeZoneSetting};
use crate::error::StorageError;
use crate::friends::Friend;
use crate::i18n::Language;
use crate::journal::{JournalEntry, Journals};
use crate::state::{AppState, Preferences, STATE_VERSION};
use crate::streak::StreakTracker;

/// Bring any supported document up to the current version.
///
/// `defaults` fills preferences the document does not carry.
pub fn migrate(doc: Value, defaults: Preferences, now: DateTime<Utc>) -> Result<AppState, StorageError> {
    let version = detect_version(&doc)?;
    if version > STATE_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: version,
            supported: STATE_VERSION,
        });
    }

    let mut doc = if version < 2 {
        tracing::info!(from = version, to = 2, "migrating state document");
        migrate_v1(doc, defaults, now)?
    } else {
        doc
    };
    repair(&mut doc);

    serde_json::from_value(doc).map_err(|e| StorageError::MigrationFailed(e.to_string()))
}

/// Reset unreadable values one at a time so a single bad field costs only
/// that field. Removed keys fall back to their serde defaults; unreadable
/// list items and accounts are dropped.
fn repair(doc: &mut Value) {
    let Some(obj) = doc.as_object_mut() else {
        return;
    };

    if let Some(Value::Object(prefs)) = obj.get_mut("preferences") {
        reset_invalid::<Language>(prefs, "language");
        reset_invalid::<TimeZoneSetting>(prefs, "timezone");
    }
    reset_invalid::<Preferences>(obj, "preferences");

    if let Some(guest) = obj.get_mut("guest") {
        repair_profile(guest);
    }
    reset_invalid::<Profile>(obj, "guest");

    if let Some(Value::Object(accounts)) = obj.get_mut("accounts") {
        accounts.retain(|name, account| {
            repair_account(account);
            let readable = serde_json::from_value::<UserAccount>(account.clone()).is_ok();
            if !readable {
                tracing::warn!(username = %name, "dropping unreadable account");
            }
            readable
        });
    }
    reset_invalid::<AccountDirectory>(obj, "accounts");
    reset_invalid::<Option<String>>(obj, "session");
    reset_invalid::<Option<usize>>(obj, "last_phrase");
}

fn repair_profile(profile: &mut Value) {
    let Some(obj) = profile.as_object_mut() else {
        return;
    };
    if let Some(Value::Object(streak)) = obj.get_mut("streak") {
        reset_invalid::<u32>(streak, "current_streak");
        reset_invalid::<u32>(streak, "best_streak");
        reset_invalid::<Option<NaiveDate>>(streak, "last_check_in");
        retain_valid::<NaiveDate>(streak, "history");
    }
    reset_invalid::<StreakTracker>(obj, "streak");

    if let Some(Value::Object(journals)) = obj.get_mut("journals") {
        retain_valid::<JournalEntry>(journals, "gratitude");
        retain_valid::<JournalEntry>(journals, "reflection");
    }
    reset_invalid::<Journals>(obj, "journals");
}

fn repair_account(account: &mut Value) {
    let Some(obj) = account.as_object_mut() else {
        return;
    };
    if let Some(profile) = obj.get_mut("profile") {
        repair_profile(profile);
    }
    reset_invalid::<Profile>(obj, "profile");
    retain_valid::<Friend>(obj, "friends");
}

/// Remove `key` if its value does not parse as `T`.
fn reset_invalid<T: DeserializeOwned>(obj: &mut Map<String, Value>, key: &str) {
    let unreadable = obj
        .get(key)
        .is_some_and(|v| serde_json::from_value::<T>(v.clone()).is_err());
    if unreadable {
        tracing::warn!(key, "resetting unreadable value");
        obj.remove(key);
    }
}

/// Drop the items of the array at `key` that do not parse as `T`.
fn retain_valid<T: DeserializeOwned>(obj: &mut Map<String, Value>, key: &str) {
    if let Some(Value::Array(items)) = obj.get_mut(key) {
        let before = items.len();
        items.retain(|item| serde_json::from_value::<T>(item.clone()).is_ok());
        if items.len() < before {
            tracing::warn!(key, dropped = before - items.len(), "dropping unreadable items");
        }
    }
    reset_invalid::<Vec<T>>(obj, key);
}

fn detect_version(doc: &Value) -> Result<u32, StorageError> {
    let obj = doc
        .as_object()
        .ok_or_else(|| StorageError::MigrationFailed("state document is not an object".into()))?;
    match obj.get("version") {
        None => Ok(1),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| StorageError::MigrationFailed(format!("bad version field: {v}"))),
    }
}

/// Local storage only held strings, so nested values were JSON-encoded
/// strings. Accept both that and plain JSON.
fn decode(value: &Value) -> Value {
    match value {
        Value::String(s) => serde_json::from_str(s).unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

fn as_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_count(value: Option<&Value>) -> u32 {
    match value.map(decode) {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn as_day(value: Option<&Value>) -> Option<NaiveDate> {
    as_text(value).and_then(|s| parse_day(&s).ok())
}

fn as_history(value: Option<&Value>) -> BTreeSet<NaiveDate> {
    match value.map(decode) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| as_day(Some(v)))
            .collect(),
        _ => BTreeSet::new(),
    }
}

fn legacy_streak(obj: &Map<String, Value>) -> StreakTracker {
    let last_check_in = as_day(obj.get("lastCheckInDate"));
    let mut history = as_history(obj.get("checkInHistory"));
    history.extend(last_check_in);
    let current_streak = as_count(obj.get("streakCount"));
    StreakTracker {
        current_streak,
        best_streak: as_count(obj.get("bestStreak")).max(current_streak),
        last_check_in,
        history,
        checked_in_today: false,
    }
}

fn legacy_entries(value: Option<&Value>, now: DateTime<Utc>) -> Vec<JournalEntry> {
    let Some(Value::Array(items)) = value.map(decode) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let (text, date) = match item {
                Value::String(s) => (s.clone(), None),
                Value::Object(o) => (
                    as_text(o.get("text"))?,
                    as_text(o.get("date")).or_else(|| as_text(o.get("createdAt"))),
                ),
                _ => return None,
            };
            let text = text.trim().to_string();
            if text.is_empty() {
                return None;
            }
            let created_at = date
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or(now);
            Some(JournalEntry {
                id: Uuid::new_v4(),
                text,
                created_at,
            })
        })
        .collect()
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_day(s).ok()?.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()))
}

fn legacy_friends(value: Option<&Value>, now: DateTime<Utc>) -> Vec<Friend> {
    let Some(Value::Array(items)) = value.map(decode) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let o = item.as_object()?;
            Some(Friend {
                username: as_text(o.get("username"))?,
                streak_count: as_count(o.get("streakCount")),
                best_streak: as_count(o.get("bestStreak")),
                captured_at: now,
            })
        })
        .collect()
}

fn migrate_v1(doc: Value, defaults: Preferences, now: DateTime<Utc>) -> Result<Value, StorageError> {
    let Value::Object(flat) = doc else {
        return Err(StorageError::MigrationFailed("state document is not an object".into()));
    };

    let preferences = Preferences {
        language: as_text(flat.get("language"))
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.language),
        timezone: as_text(flat.get("timezone"))
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.timezone),
    };

    let guest = Profile {
        streak: legacy_streak(&flat),
        journals: Journals {
            gratitude: legacy_entries(flat.get("journalEntries"), now),
            reflection: legacy_entries(flat.get("reflectionEntries"), now),
        },
    };

    let mut accounts = AccountDirectory::default();
    if let Some(Value::Array(users)) = flat.get("users").map(decode) {
        for user in users.iter().filter_map(Value::as_object) {
            let Some(username) = as_text(user.get("username")).filter(|u| !u.trim().is_empty()) else {
                continue;
            };
            let Some(password) = as_text(user.get("password")).filter(|p| !p.is_empty()) else {
                tracing::warn!(%username, "skipping legacy user without a password");
                continue;
            };
            let password = PasswordHash::new(&password)
                .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
            let friends_key = format!("friends_{username}");
            accounts.insert(UserAccount {
                email: as_text(user.get("email")).unwrap_or_default(),
                password,
                profile: Profile {
                    streak: legacy_streak(user),
                    journals: Journals::default(),
                },
                friends: legacy_friends(flat.get(&friends_key).or_else(|| user.get("friends")), now),
                created_at: now,
                username,
            });
        }
    }

    let session = match flat.get("currentUser").map(decode) {
        Some(Value::Object(o)) => as_text(o.get("username")),
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
    .filter(|name| accounts.contains(name));

    tracing::info!(accounts = accounts.len(), logged_in = session.is_some(), "legacy state migrated");

    let state = AppState {
        version: 2,
        preferences,
        guest,
        accounts,
        session,
        last_phrase: None,
    };
    serde_json::to_value(state).map_err(|e| StorageError::MigrationFailed(e.to_string()))
}
