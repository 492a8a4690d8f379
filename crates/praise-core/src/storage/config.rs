//! TOML-based application configuration.
//!
//! Stores device-level settings:
//! - Defaults for language and timezone applied to a fresh state document
//! - Praise phrase list and haptics toggle
//! - Log level
//!
//! Configuration is stored at `~/.config/praise-machine/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::clock::TimeZoneSetting;
use crate::error::ConfigError;
use crate::i18n::Language;
use crate::state::Preferences;

/// Settings a brand-new state document starts with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub timezone: TimeZoneSetting,
}

/// Praise output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PraiseConfig {
    /// Phrase assets, picked at random without immediate repeats.
    #[serde(default = "default_phrases")]
    pub phrases: Vec<String>,
    #[serde(default = "default_true")]
    pub haptics: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Used when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/praise-machine/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub praise: PraiseConfig,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_phrases() -> Vec<String> {
    (1..=4).map(|i| format!("assets/phrase{i}.mp3")).collect()
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for PraiseConfig {
    fn default() -> Self {
        Self {
            phrases: default_phrases(),
            haptics: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field (an unknown timezone, a language other than en/zh, ...).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    /// Preferences for a state document created from scratch.
    pub fn initial_preferences(&self) -> Preferences {
        Preferences {
            language: self.defaults.language,
            timezone: self.defaults.timezone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.praise.phrases.len(), 4);
        assert!(parsed.praise.haptics);
        assert_eq!(parsed.defaults.timezone, TimeZoneSetting::Local);
    }

    #[test]
    fn empty_file_gets_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.log.level, "warn");
        assert_eq!(parsed.defaults.language, Language::En);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("praise.haptics").as_deref(), Some("true"));
        assert_eq!(cfg.get("defaults.timezone").as_deref(), Some("local"));
        assert_eq!(cfg.get("defaults.language").as_deref(), Some("en"));
        assert!(cfg.get("praise.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_validates_through_the_typed_config() {
        let mut cfg = Config::default();
        cfg.set("defaults.timezone", "Asia/Shanghai").unwrap();
        assert_eq!(cfg.defaults.timezone.to_string(), "Asia/Shanghai");

        assert!(cfg.set("defaults.timezone", "Nowhere/Special").is_err());
        assert!(cfg.set("defaults.language", "fr").is_err());
        cfg.set("defaults.language", "zh").unwrap();
        assert_eq!(cfg.defaults.language, Language::Zh);
    }

    #[test]
    fn set_handles_bool_and_list() {
        let mut cfg = Config::default();
        cfg.set("praise.haptics", "false").unwrap();
        assert!(!cfg.praise.haptics);
        assert!(cfg.set("praise.haptics", "maybe").is_err());

        cfg.set("praise.phrases", r#"["a.mp3","b.mp3"]"#).unwrap();
        assert_eq!(cfg.praise.phrases, vec!["a.mp3", "b.mp3"]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("praise.volume", "3"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.log.level, "warn");

        std::fs::write(&path, "[log]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().log.level, "debug");

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
