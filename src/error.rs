//! Error types for worklog

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for worklog application
#[derive(Debug, Error)]
pub enum WorklogError {
    #[error("Not a worklog directory: {0}")]
    NotWorklogDirectory(PathBuf),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Entry store is full: {size} bytes exceeds the {quota} byte quota")]
    StorageFull { size: usize, quota: usize },

    #[error("Failed to save entries: {0}")]
    SaveFailed(String),

    #[error("Invalid import file: {0}")]
    InvalidImport(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Save to spreadsheet failed: {0}")]
    SpreadsheetBusy(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Cloud request failed: {0}")]
    Cloud(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl WorklogError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            WorklogError::NotWorklogDirectory(_) => 2,
            WorklogError::InvalidDate(_) => 3,
            WorklogError::EntryNotFound(_) => 4,
            WorklogError::Validation(_) => 5,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            WorklogError::NotWorklogDirectory(path) => {
                format!(
                    "Not a worklog directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'worklog init' in this directory to create a new journal\n\
                    • Navigate to an existing worklog directory\n\
                    • Set WORKLOG_ROOT environment variable to your journal path",
                    path.display()
                )
            }
            WorklogError::InvalidDate(input) => {
                format!(
                    "Invalid date: '{}'\n\n\
                    Valid dates:\n\
                    • today, yesterday, tomorrow\n\
                    • monday, tuesday, ..., sunday (most recent)\n\
                    • last monday, next friday, etc.\n\
                    • Specific dates: YYYY-MM-DD (e.g., 2024-01-03)\n\n\
                    Examples:\n\
                    worklog add today --notes \"...\"\n\
                    worklog list --from 2024-01-01 --to 2024-01-31",
                    input
                )
            }
            WorklogError::EntryNotFound(id) => {
                format!(
                    "No entry with id '{}'\n\n\
                    Suggestions:\n\
                    • Use 'worklog list' to see entry ids",
                    id
                )
            }
            WorklogError::StorageFull { .. } | WorklogError::SaveFailed(_) => {
                format!(
                    "Saving failed. Try exporting your data and clearing some space.\n({})",
                    self
                )
            }
            WorklogError::InvalidImport(_) => {
                "Import failed. Please select a valid JSON file exported from this app."
                    .to_string()
            }
            WorklogError::PermissionDenied(msg) => msg.clone(),
            WorklogError::SpreadsheetBusy(_) => {
                format!(
                    "{} (Close the spreadsheet if it is open, then try again.)",
                    self
                )
            }
            WorklogError::NotSignedIn => "Not signed in.\n\n\
                Suggestions:\n\
                • Sign in first: worklog cloud signin --account you@example.com\n\
                • Or provide a token through WORKLOG_ACCESS_TOKEN"
                .to_string(),
            WorklogError::Cloud(_) | WorklogError::Http(_) => {
                format!("Sync failed. ({})", self)
            }
            WorklogError::Editor(msg) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check that your editor is installed and in PATH\n\
                    • Set EDITOR environment variable (e.g., export EDITOR=nano)\n\
                    • Pass the text directly: worklog add --notes \"...\"",
                    msg
                )
            }
            WorklogError::Config(msg) => {
                if msg.contains("Unknown config key") {
                    format!(
                        "{}\n\n\
                        Example: worklog config cloud.file_name DailyWorkTracker.csv",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using WorklogError
pub type Result<T> = std::result::Result<T, WorklogError>;
