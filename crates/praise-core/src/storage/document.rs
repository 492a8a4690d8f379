//! Persistence for the application state document.
//!
//! The document is one JSON file. Reads go through [`migrate`], so any
//! supported older layout is upgraded on load. Unparseable files are moved
//! aside and replaced by a fresh document instead of failing the caller.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::data_dir;
use super::migrations::migrate;
use crate::error::{Result, StorageError};
use crate::state::{AppState, Preferences};

const STATE_FILE: &str = "state.json";

/// Where the state document lives.
pub trait StateStore {
    /// Load the document, or a fresh one built from `defaults`.
    fn load(&self, defaults: Preferences, now: DateTime<Utc>) -> Result<AppState>;

    fn save(&self, state: &AppState) -> Result<()>;
}

/// Turn raw document text into state. Corrupt text yields `None`.
fn parse_document(
    raw: &str,
    defaults: Preferences,
    now: DateTime<Utc>,
) -> Result<Option<AppState>> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "state document is not valid JSON");
            return Ok(None);
        }
    };
    match migrate(value, defaults, now) {
        Ok(state) => Ok(Some(state)),
        // Never overwrite data written by a newer build.
        Err(e @ StorageError::UnsupportedVersion { .. }) => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "state document could not be read");
            Ok(None)
        }
    }
}

/// JSON file in the data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `state.json` in the data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(data_dir()?.join(STATE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt");
        PathBuf::from(name)
    }
}

impl StateStore for FileStore {
    fn load(&self, defaults: Preferences, now: DateTime<Utc>) -> Result<AppState> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no state document yet");
                return Ok(AppState::new(defaults));
            }
            Err(e) => return Err(e.into()),
        };

        match parse_document(&raw, defaults, now)? {
            Some(state) => Ok(state),
            None => {
                let backup = self.backup_path();
                if let Err(e) = std::fs::rename(&self.path, &backup) {
                    tracing::warn!(error = %e, "could not move corrupt state aside");
                } else {
                    tracing::warn!(backup = %backup.display(), "corrupt state moved aside, starting fresh");
                }
                Ok(AppState::new(defaults))
            }
        }
    }

    /// Write to a sibling temp file, then rename over the document.
    fn save(&self, state: &AppState) -> Result<()> {
        let failed = |message: String| StorageError::WriteFailed {
            path: self.path.clone(),
            message,
        };
        let content = serde_json::to_string_pretty(state)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;
        }

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, content).map_err(|e| failed(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| failed(e.to_string()))?;
        tracing::debug!(path = %self.path.display(), "state saved");
        Ok(())
    }
}

/// In-memory document for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw document text, e.g. a legacy layout.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, defaults: Preferences, now: DateTime<Utc>) -> Result<AppState> {
        let raw = self.raw.borrow().clone();
        match raw {
            None => Ok(AppState::new(defaults)),
            Some(raw) => Ok(parse_document(&raw, defaults, now)?.unwrap_or_else(|| AppState::new(defaults))),
        }
    }

    fn save(&self, state: &AppState) -> Result<()> {
        *self.raw.borrow_mut() = Some(serde_json::to_string(state)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use chrono::TimeZone;

    fn zh() -> Preferences {
        Preferences {
            language: Language::Zh,
            ..Default::default()
        }
    }

    #[test]
    fn missing_file_gives_fresh_state_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state.json"));
        let state = store.load(zh(), Utc::now()).unwrap();
        assert_eq!(state.preferences.language, Language::Zh);
        assert!(!store.path().exists());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("state.json"));
        let now = Utc::now();

        let mut state = AppState::default();
        state.check_in(now);
        store.save(&state).unwrap();

        let loaded = store.load(Preferences::default(), now).unwrap();
        assert_eq!(loaded.guest.streak.current_streak, 1);
        assert!(!dir.path().join("nested").join("state.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let store = FileStore::new(&path);
        let state = store.load(zh(), Utc::now()).unwrap();
        assert_eq!(state, AppState::new(zh()));
        assert!(dir.path().join("state.json.corrupt").exists());
        assert!(!path.exists());
    }

    #[test]
    fn bad_field_does_not_discard_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = FileStore::new(&path);
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let prefs = Preferences {
            timezone: "UTC".parse().unwrap(),
            ..Default::default()
        };

        let mut state = AppState::new(prefs);
        state.signup("amy", "pw", "amy@example.com", false, now).unwrap();
        state.check_in(now);
        store.save(&state).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"last_check_in\": \"2024-05-01\""));
        std::fs::write(&path, raw.replace("\"2024-05-01\"", "\"garbage\"")).unwrap();

        let loaded = store.load(prefs, now).unwrap();
        assert_eq!(loaded.accounts.len(), 1);
        assert_eq!(loaded.current_user(), Some("amy"));
        assert!(!dir.path().join("state.json.corrupt").exists());
    }

    #[test]
    fn checked_in_today_is_not_persisted() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let mut state = AppState::default();
        state.check_in(now);
        assert!(state.guest.streak.checked_in_today);
        store.save(&state).unwrap();

        assert!(!store.raw().unwrap().contains("checked_in_today"));
        let loaded = store.load(Preferences::default(), now).unwrap();
        assert!(!loaded.guest.streak.checked_in_today);
    }

    #[test]
    fn newer_document_is_an_error_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"version": 7}"#).unwrap();

        let store = FileStore::new(&path);
        assert!(store.load(zh(), Utc::now()).is_err());
        assert!(path.exists());
    }

    #[test]
    fn memory_store_roundtrips_and_migrates() {
        let store = MemoryStore::with_raw(r#"{"streakCount":"3","lastCheckInDate":"2024-01-03"}"#);
        let state = store.load(Preferences::default(), Utc::now()).unwrap();
        assert_eq!(state.guest.streak.current_streak, 3);

        store.save(&state).unwrap();
        assert!(store.raw().unwrap().contains("\"version\":2"));
    }
}
