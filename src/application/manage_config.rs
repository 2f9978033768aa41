//! Config management use case

use crate::error::{Result, WorklogError};
use crate::infrastructure::{Config, FileSystemRepository, JournalRepository};

/// Keys accepted by `get` and listed by `entries`
pub const CONFIG_KEYS: [&str; 7] = [
    "editor",
    "storage.quota_bytes",
    "spreadsheet.sheet_name",
    "spreadsheet.persistent_handles",
    "cloud.base_url",
    "cloud.file_name",
    "created",
];

/// Service for managing journal configuration
pub struct ConfigService {
    repository: FileSystemRepository,
}

impl ConfigService {
    /// Create a new config service
    pub fn new(repository: FileSystemRepository) -> Self {
        ConfigService { repository }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.repository.load_config()?;
        value_of(&config, key)
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.repository.load_config()?;

        match key {
            "editor" => config.editor = value.to_string(),
            "storage.quota_bytes" => {
                config.storage.quota_bytes = value.parse().map_err(|_| {
                    WorklogError::Config(format!(
                        "Invalid value for storage.quota_bytes: '{}' (expected a byte count)",
                        value
                    ))
                })?;
            }
            "spreadsheet.sheet_name" => {
                if value.trim().is_empty() {
                    return Err(WorklogError::Config(
                        "spreadsheet.sheet_name cannot be empty".to_string(),
                    ));
                }
                config.spreadsheet.sheet_name = value.to_string();
            }
            "spreadsheet.persistent_handles" => {
                config.spreadsheet.persistent_handles = parse_bool(value)?;
            }
            "cloud.base_url" => config.cloud.base_url = value.to_string(),
            "cloud.file_name" => {
                if value.trim().is_empty() {
                    return Err(WorklogError::Config(
                        "cloud.file_name cannot be empty".to_string(),
                    ));
                }
                config.cloud.file_name = value.to_string();
            }
            "created" => {
                return Err(WorklogError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => return Err(unknown_key(key)),
        }

        self.repository.save_config(&config)?;
        Ok(())
    }

    /// All keys with their current values, in [`CONFIG_KEYS`] order
    pub fn entries(&self) -> Result<Vec<(&'static str, String)>> {
        let config = self.repository.load_config()?;
        CONFIG_KEYS
            .iter()
            .map(|key| value_of(&config, key).map(|value| (*key, value)))
            .collect()
    }
}

fn value_of(config: &Config, key: &str) -> Result<String> {
    match key {
        "editor" => Ok(config.editor.clone()),
        "storage.quota_bytes" => Ok(config.storage.quota_bytes.to_string()),
        "spreadsheet.sheet_name" => Ok(config.spreadsheet.sheet_name.clone()),
        "spreadsheet.persistent_handles" => Ok(config.spreadsheet.persistent_handles.to_string()),
        "cloud.base_url" => Ok(config.cloud.base_url.clone()),
        "cloud.file_name" => Ok(config.cloud.file_name.clone()),
        "created" => Ok(config.created.to_rfc3339()),
        _ => Err(unknown_key(key)),
    }
}

fn unknown_key(key: &str) -> WorklogError {
    WorklogError::Config(format!(
        "Unknown config key: '{}'. Valid keys are: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(WorklogError::Config(format!(
            "Invalid boolean: '{}' (expected true or false)",
            value
        ))),
    }
}
