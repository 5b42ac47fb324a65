use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_STORAGE_KEY: &str = "incidents";
pub const DEFAULT_CONFIRM_MESSAGE: &str = "Delete this incident? This action cannot be undone.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid table config: {0}")]
    Parse(String),

    #[error("storage key must not be empty")]
    EmptyStorageKey,
}

/// Settings for an incident table. Every field has a default, so a partial
/// JSON object is accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Key of the persistent slot the collection is mirrored to.
    pub storage_key: String,
    /// Prompt shown before a delete.
    pub confirm_message: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            confirm_message: DEFAULT_CONFIRM_MESSAGE.to_string(),
        }
    }
}

impl TableConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(config)
    }
}
