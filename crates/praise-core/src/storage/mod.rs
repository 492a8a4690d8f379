mod config;
pub mod document;
pub mod migrations;

pub use config::{Config, DefaultsConfig, LogConfig, PraiseConfig};
pub use document::{FileStore, MemoryStore, StateStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory.
///
/// `PRAISE_MACHINE_HOME` wins outright. Otherwise it is
/// `~/.config/praise-machine[-dev]/`, with `-dev` when `PRAISE_MACHINE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PRAISE_MACHINE_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PRAISE_MACHINE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("praise-machine-dev")
            } else {
                base_dir.join("praise-machine")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
