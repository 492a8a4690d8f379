//! Local account directory.
//!
//! Accounts live in the same device-local document as everything else.
//! There is no server; "login" only decides whose profile is active.
//! Passwords are kept as salted SHA-256 digests, never as plaintext.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AuthError;
use crate::friends::Friend;
use crate::journal::Journals;
use crate::streak::StreakTracker;

/// Everything that belongs to one person: streak, history and journals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub streak: StreakTracker,
    #[serde(default)]
    pub journals: Journals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash {
    salt: String,
    digest: String,
}

impl PasswordHash {
    pub fn new(password: &str) -> Result<Self, AuthError> {
        let mut salt = [0u8; 16];
        getrandom::getrandom(&mut salt).map_err(|e| AuthError::Salt(e.to_string()))?;
        Ok(Self::with_salt(password, &salt))
    }

    fn with_salt(password: &str, salt: &[u8]) -> Self {
        Self {
            salt: hex::encode(salt),
            digest: Self::digest(password, salt),
        }
    }

    fn digest(password: &str, salt: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn verify(&self, password: &str) -> bool {
        match hex::decode(&self.salt) {
            Ok(salt) => Self::digest(password, &salt) == self.digest,
            Err(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub email: String,
    pub password: PasswordHash,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub friends: Vec<Friend>,
    pub created_at: DateTime<Utc>,
}

/// All accounts known on this device, keyed by username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountDirectory {
    accounts: BTreeMap<String, UserAccount>,
}

impl AccountDirectory {
    pub fn signup(
        &mut self,
        username: &str,
        password: &str,
        email: &str,
        profile: Profile,
        now: DateTime<Utc>,
    ) -> Result<&UserAccount, AuthError> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || password.is_empty() || email.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if self.accounts.contains_key(username) {
            return Err(AuthError::UsernameTaken(username.to_string()));
        }

        let account = UserAccount {
            username: username.to_string(),
            email: email.to_string(),
            password: PasswordHash::new(password)?,
            profile,
            friends: Vec::new(),
            created_at: now,
        };
        tracing::info!(username, "account created");
        Ok(self.accounts.entry(username.to_string()).or_insert(account))
    }

    /// Check credentials. Unknown users and bad passwords fail identically.
    /// An empty password never authenticates.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&UserAccount, AuthError> {
        match self.accounts.get(username.trim()) {
            Some(account) if !password.is_empty() && account.password.verify(password) => Ok(account),
            _ => {
                tracing::debug!(username, "authentication failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    pub fn get(&self, username: &str) -> Option<&UserAccount> {
        self.accounts.get(username)
    }

    pub fn get_mut(&mut self, username: &str) -> Option<&mut UserAccount> {
        self.accounts.get_mut(username)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.accounts.contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(String::as_str)
    }

    /// Insert an account as-is. Used by migration, which already has hashes.
    pub(crate) fn insert(&mut self, account: UserAccount) {
        self.accounts.insert(account.username.clone(), account);
    }
}
