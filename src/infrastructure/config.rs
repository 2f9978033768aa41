//! Configuration management

use crate::error::{WorklogError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Directory holding config and data slots inside a journal root
pub const WORKLOG_DIR: &str = ".worklog";

const CONFIG_FILE: &str = "config.toml";

/// Default capacity of the entry slot, in bytes of serialized JSON
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub editor: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub spreadsheet: SpreadsheetConfig,
    #[serde(default)]
    pub cloud: CloudConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub quota_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetConfig {
    pub sheet_name: String,
    /// Remember a picked file and write to it; when off, every save writes a
    /// fresh dated file into the output directory instead
    pub persistent_handles: bool,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        SpreadsheetConfig {
            sheet_name: "DailyWork".to_string(),
            persistent_handles: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Drive root endpoint; children are addressed beneath it
    pub base_url: String,
    pub file_name: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        CloudConfig {
            base_url: "https://graph.microsoft.com/v1.0/me/drive/root".to_string(),
            file_name: "DailyWorkTracker.csv".to_string(),
        }
    }
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Config {
            editor: Self::detect_default_editor(),
            created: Utc::now(),
            storage: StorageConfig::default(),
            spreadsheet: SpreadsheetConfig::default(),
            cloud: CloudConfig::default(),
        }
    }

    /// Load config from .worklog/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(WORKLOG_DIR).join(CONFIG_FILE);

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WorklogError::NotWorklogDirectory(path.to_path_buf())
            } else {
                WorklogError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| WorklogError::Config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Save config to .worklog/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let worklog_dir = path.join(WORKLOG_DIR);
        let config_path = worklog_dir.join(CONFIG_FILE);

        if !worklog_dir.exists() {
            fs::create_dir(&worklog_dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| WorklogError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the editor command, checking environment variables first
    pub fn get_editor(&self) -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| self.editor.clone())
    }

    fn detect_default_editor() -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(windows) {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
