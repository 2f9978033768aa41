//! Remembered output files
//!
//! A [`FileHandle`] is a file the user picked once. Its path survives across
//! runs in the handle slot, and write permission is re-checked before every
//! write since the file may have changed underneath us.

use crate::error::{Result, WorklogError};
use crate::infrastructure::repository::write_atomic;
use crate::infrastructure::FileSystemRepository;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const HANDLES_SLOT: &str = "handles.toml";

/// A previously picked file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub path: PathBuf,
}

impl FileHandle {
    pub fn new(path: PathBuf) -> Self {
        FileHandle { path }
    }

    /// Whether the file can be written right now.
    ///
    /// An existing file must be a writable regular file; a missing one needs
    /// an existing, writable parent directory.
    pub fn ensure_write_permission(&self) -> bool {
        match fs::metadata(&self.path) {
            Ok(meta) => meta.is_file() && !meta.permissions().readonly(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let parent = match self.path.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p,
                    _ => Path::new("."),
                };
                fs::metadata(parent)
                    .map(|meta| meta.is_dir() && !meta.permissions().readonly())
                    .unwrap_or(false)
            }
            Err(e) => {
                debug!("Permission check failed for {}: {}", self.path.display(), e);
                false
            }
        }
    }

    /// Replace the file's content after re-checking permission
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        if !self.ensure_write_permission() {
            return Err(WorklogError::PermissionDenied(
                "Permission to write the selected spreadsheet file was not granted.".to_string(),
            ));
        }
        write_atomic(&self.path, bytes).map_err(|e| match e {
            WorklogError::Io(io) => write_error(io),
            other => other,
        })
    }
}

/// OS error codes for a file held open by another program
#[cfg(windows)]
const BUSY_OS_ERRORS: &[i32] = &[32, 33];
#[cfg(not(windows))]
const BUSY_OS_ERRORS: &[i32] = &[16, 26];

fn write_error(io: std::io::Error) -> WorklogError {
    let busy = io
        .raw_os_error()
        .is_some_and(|code| BUSY_OS_ERRORS.contains(&code));
    if busy {
        WorklogError::SpreadsheetBusy(io.to_string())
    } else {
        WorklogError::PermissionDenied(format!("Save to spreadsheet failed: {}", io))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HandleRecord {
    spreadsheet: Option<FileHandle>,
}

/// Persistence slot remembering the picked spreadsheet file
#[derive(Debug, Clone)]
pub struct HandleSlot {
    repository: FileSystemRepository,
}

impl HandleSlot {
    pub fn new(repository: FileSystemRepository) -> Self {
        HandleSlot { repository }
    }

    /// Remembered handle, if any. Unreadable slots count as empty.
    pub fn get(&self) -> Option<FileHandle> {
        let raw = match self.repository.read_slot(HANDLES_SLOT) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read remembered file: {}", e);
                return None;
            }
        };
        match toml::from_str::<HandleRecord>(&raw) {
            Ok(record) => record.spreadsheet,
            Err(e) => {
                warn!("Ignoring malformed {}: {}", HANDLES_SLOT, e);
                None
            }
        }
    }

    pub fn put(&self, handle: &FileHandle) -> Result<()> {
        let record = HandleRecord {
            spreadsheet: Some(handle.clone()),
        };
        self.repository
            .write_slot(HANDLES_SLOT, &toml::to_string_pretty(&record)?)
    }

    pub fn clear(&self) -> Result<()> {
        self.repository.remove_slot(HANDLES_SLOT)
    }
}
