//! Free-text journals. Each profile keeps two independent collections.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalKind {
    Gratitude,
    Reflection,
}

impl fmt::Display for JournalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalKind::Gratitude => f.write_str("gratitude"),
            JournalKind::Reflection => f.write_str("reflection"),
        }
    }
}

impl FromStr for JournalKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gratitude" => Ok(JournalKind::Gratitude),
            "reflection" => Ok(JournalKind::Reflection),
            other => Err(ValidationError::invalid(
                "journal",
                format!("'{other}' (expected gratitude or reflection)"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journals {
    #[serde(default)]
    pub gratitude: Vec<JournalEntry>,
    #[serde(default)]
    pub reflection: Vec<JournalEntry>,
}

impl Journals {
    fn collection(&self, kind: JournalKind) -> &Vec<JournalEntry> {
        match kind {
            JournalKind::Gratitude => &self.gratitude,
            JournalKind::Reflection => &self.reflection,
        }
    }

    fn collection_mut(&mut self, kind: JournalKind) -> &mut Vec<JournalEntry> {
        match kind {
            JournalKind::Gratitude => &mut self.gratitude,
            JournalKind::Reflection => &mut self.reflection,
        }
    }

    pub fn add(
        &mut self,
        kind: JournalKind,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::Empty("journal entry".into()));
        }
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            text: text.to_string(),
            created_at: now,
        };
        self.collection_mut(kind).push(entry.clone());
        Ok(entry)
    }

    /// Entries of one journal, newest first.
    pub fn list(&self, kind: JournalKind) -> Vec<&JournalEntry> {
        let mut entries: Vec<&JournalEntry> = self.collection(kind).iter().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    pub fn delete(&mut self, kind: JournalKind, id: Uuid) -> Result<JournalEntry, ValidationError> {
        let entries = self.collection_mut(kind);
        let pos = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ValidationError::NotFound {
                kind: format!("{kind} entry"),
                id: id.to_string(),
            })?;
        Ok(entries.remove(pos))
    }
}
