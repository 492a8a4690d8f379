//! # Praise Machine Core Library
//!
//! Business logic for the praise machine: one button that praises you and
//! counts how many days in a row you have pressed it. The CLI in
//! `praise-cli` is a thin layer over this crate; any other front-end
//! (a widget, a phone app) would be one too.
//!
//! ## Architecture
//!
//! - **Streak Tracker**: per-day check-in state machine with milestones
//! - **State**: one explicit [`AppState`] value, mutated by update functions
//!   that take the current instant and return [`Event`]s
//! - **Storage**: versioned JSON state document with migration from the
//!   legacy flat key/value layout, plus TOML configuration
//! - **Social**: local accounts, directed friend links, two journals
//!
//! ## Key Components
//!
//! - [`StreakTracker`]: evaluate / check-in state machine
//! - [`AppState`]: the whole persisted document
//! - [`StateStore`]: load/save seam, with [`FileStore`] and [`MemoryStore`]
//! - [`Config`]: device configuration

pub mod account;
pub mod calendar;
pub mod clock;
pub mod error;
pub mod events;
pub mod friends;
pub mod i18n;
pub mod journal;
pub mod praise;
pub mod state;
pub mod storage;
pub mod streak;

pub use account::{AccountDirectory, Profile, UserAccount};
pub use calendar::{DayCell, MonthView, YearMonth};
pub use clock::TimeZoneSetting;
pub use error::{AuthError, ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use friends::Friend;
pub use i18n::Language;
pub use journal::{JournalEntry, JournalKind, Journals};
pub use praise::{FeedbackError, FeedbackSink, Praise, SilentSink};
pub use state::{AppState, Preferences, StatusReport, STATE_VERSION};
pub use storage::{Config, FileStore, MemoryStore, StateStore};
pub use streak::{CheckInOutcome, Evaluation, FireTier, Milestone, StreakTracker};
