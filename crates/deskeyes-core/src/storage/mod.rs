mod config;
pub mod kv;

pub use config::{Config, GoalsConfig, LoggingConfig, StorageBackend, StorageConfig};
pub use kv::{MemoryStore, SqliteStore};

use std::path::PathBuf;

use crate::error::Result;

/// Key holding the exercise history blob.
pub const PROGRESS_KEY: &str = "eye-care-progress:v1";
/// Key holding the unlocked achievements blob.
pub const ACHIEVEMENTS_KEY: &str = "eye-care-achievements:v1";
/// Key holding the user settings blob (owned by the settings screen).
pub const SETTINGS_KEY: &str = "eye-care-settings:v2";

/// String-blob persistence the stores write through.
///
/// Every store owns exactly one key; values are whole JSON documents, never
/// deltas, so the last successful `set` always reflects the full state.
pub trait KeyValueStore: Send + Sync {
    /// Read the blob stored under `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Returns the data directory.
///
/// `DESKEYES_DATA_DIR` wins when set; otherwise `~/.config/deskeyes[-dev]/`
/// based on `DESKEYES_ENV` (set it to `dev` for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("DESKEYES_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("DESKEYES_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("deskeyes-dev")
            } else {
                base_dir.join("deskeyes")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
