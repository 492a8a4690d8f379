//! Core error types for praise-core.
//!
//! This module defines the error hierarchy using thiserror. Front-ends
//! report these to the user; nothing in the core panics on bad input.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for praise-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// State document errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication and account errors
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not determine where to keep data
    #[error("Cannot determine data directory: {0}")]
    DataDir(String),
}

/// State document errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Document was written by a newer build
    #[error("state document version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Migration from an older layout failed
    #[error("state migration failed: {0}")]
    MigrationFailed(String),

    /// Failed to write the document
    #[error("Failed to write state to {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },
}

/// Account, session and friend-list errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("username, password and email are required")]
    MissingFields,

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    /// Unknown user and wrong password look the same to the caller.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("no account named '{0}'")]
    UnknownUser(String),

    #[error("cannot add yourself as a friend")]
    SelfFriend,

    #[error("'{0}' is already a friend")]
    AlreadyFriends(String),

    #[error("'{0}' is not in your friends list")]
    NotAFriend(String),

    #[error("failed to generate password salt: {0}")]
    Salt(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty input where text is required
    #[error("{0} must not be empty")]
    Empty(String),

    /// Entity lookup failed
    #[error("{kind} '{id}' not found")]
    NotFound { kind: String, id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
