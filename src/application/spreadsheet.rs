//! Legacy spreadsheet output: remembered file, download fallback, autosave

use crate::application::session::Session;
use crate::domain::tabular::ascending_snapshot;
use crate::domain::Entry;
use crate::error::{Result, WorklogError};
use crate::infrastructure::config::SpreadsheetConfig;
use crate::infrastructure::repository::write_atomic;
use crate::infrastructure::{FileHandle, FileSystemRepository, HandleSlot, Sheet, WorkbookCodec};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where a save went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// The remembered file was rewritten
    Handle(PathBuf),
    /// A fresh dated file was written
    Download(PathBuf),
}

impl SaveTarget {
    pub fn path(&self) -> &Path {
        match self {
            SaveTarget::Handle(path) | SaveTarget::Download(path) => path,
        }
    }
}

/// Remembered spreadsheet and whether it can be written now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetStatus {
    pub handle: Option<FileHandle>,
    pub writable: bool,
    pub persistent_handles: bool,
}

pub struct SpreadsheetService<C: WorkbookCodec> {
    slot: HandleSlot,
    config: SpreadsheetConfig,
    codec: C,
}

impl<C: WorkbookCodec> SpreadsheetService<C> {
    pub fn new(repository: FileSystemRepository, config: SpreadsheetConfig, codec: C) -> Self {
        SpreadsheetService {
            slot: HandleSlot::new(repository),
            config,
            codec,
        }
    }

    /// Download-style name for a save made on `date_iso`
    pub fn download_filename(&self, date_iso: &str) -> String {
        format!("DailyWorkTracker-{}.{}", date_iso, self.codec.extension())
    }

    fn encode(&self, entries: &[Entry]) -> Result<Vec<u8>> {
        let sheet = Sheet::from_entries(&self.config.sheet_name, &ascending_snapshot(entries));
        self.codec.encode(&sheet)
    }

    /// Remember `path` as the spreadsheet and write `entries` into it.
    ///
    /// A file that fails the permission check or the first write is not
    /// remembered.
    pub fn pick(&self, path: &Path, entries: &[Entry]) -> Result<FileHandle> {
        if !self.config.persistent_handles {
            return Err(WorklogError::Config(
                "Remembering a spreadsheet file is disabled (spreadsheet.persistent_handles = false). \
                 Use 'worklog sheet save' to write a dated copy instead."
                    .to_string(),
            ));
        }

        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let handle = FileHandle::new(path);
        if !handle.ensure_write_permission() {
            return Err(WorklogError::PermissionDenied(
                "Permission to write the selected spreadsheet file was not granted.".to_string(),
            ));
        }

        handle.write(&self.encode(entries)?)?;
        self.slot.put(&handle)?;
        info!(path = %handle.path.display(), "Remembered spreadsheet");
        Ok(handle)
    }

    /// Write `entries` to the remembered file, or as a dated file into
    /// `output_dir` when one is given or handles are disabled
    pub fn save(
        &self,
        entries: &[Entry],
        output_dir: Option<&Path>,
        date_iso: &str,
    ) -> Result<SaveTarget> {
        if output_dir.is_some() || !self.config.persistent_handles {
            let dir = output_dir.unwrap_or_else(|| Path::new("."));
            let path = dir.join(self.download_filename(date_iso));
            write_atomic(&path, &self.encode(entries)?)?;
            info!(path = %path.display(), "Wrote spreadsheet copy");
            return Ok(SaveTarget::Download(path));
        }

        let handle = self.slot.get().ok_or_else(|| {
            WorklogError::Config(
                "No spreadsheet selected. Run 'worklog sheet pick <PATH>' first.".to_string(),
            )
        })?;
        handle.write(&self.encode(entries)?)?;
        Ok(SaveTarget::Handle(handle.path))
    }

    /// Rewrite the session's spreadsheet, if there is one
    pub fn autosave(&self, entries: &[Entry], session: &Session) -> Option<Result<PathBuf>> {
        let handle = session.spreadsheet.as_ref()?;
        let outcome = self
            .encode(entries)
            .and_then(|bytes| handle.write(&bytes))
            .map(|_| handle.path.clone());
        if let Err(e) = &outcome {
            warn!("Autosave to {} failed: {}", handle.path.display(), e);
        }
        Some(outcome)
    }

    pub fn status(&self) -> SheetStatus {
        let handle = self.slot.get();
        let writable = handle
            .as_ref()
            .map(FileHandle::ensure_write_permission)
            .unwrap_or(false);
        SheetStatus {
            handle,
            writable,
            persistent_handles: self.config.persistent_handles,
        }
    }

    /// Forget the remembered file; the file itself is left alone
    pub fn forget(&self) -> Result<()> {
        self.slot.clear()
    }
}
