//! File system repository: journal discovery, config and slot files

use crate::error::{Result, WorklogError};
use crate::infrastructure::config::WORKLOG_DIR;
use crate::infrastructure::Config;
use std::fs;
use std::path::{Path, PathBuf};

/// Abstract repository for journal operations
pub trait JournalRepository {
    /// Get the root directory of this repository
    fn root(&self) -> &Path;

    /// Load configuration from .worklog/config.toml
    fn load_config(&self) -> Result<Config>;

    /// Save configuration to .worklog/config.toml
    fn save_config(&self, config: &Config) -> Result<()>;

    /// Check if .worklog directory exists
    fn is_initialized(&self) -> bool;

    /// Create .worklog directory structure
    fn initialize(&self) -> Result<()>;
}

/// File system implementation of JournalRepository
#[derive(Debug, Clone)]
pub struct FileSystemRepository {
    pub root: PathBuf,
}

impl FileSystemRepository {
    /// Create a new repository with the given root directory
    pub fn new(root: PathBuf) -> Self {
        FileSystemRepository { root }
    }

    /// Discover journal root: WORKLOG_ROOT first, then walk up from the
    /// current directory
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var("WORKLOG_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_worklog_dir(&path) {
                return Ok(FileSystemRepository::new(path));
            } else {
                return Err(WorklogError::Config(format!(
                    "WORKLOG_ROOT is set to '{}' but no .worklog directory found. \
                    Run 'worklog init' in that directory or unset WORKLOG_ROOT.",
                    path.display()
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover journal root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_worklog_dir(&current) {
                return Ok(FileSystemRepository::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(WorklogError::NotWorklogDirectory(start.to_path_buf())),
            }
        }
    }

    fn has_worklog_dir(path: &Path) -> bool {
        path.join(WORKLOG_DIR).is_dir()
    }

    /// Absolute path of a slot file inside .worklog
    pub fn slot_path(&self, name: &str) -> PathBuf {
        self.root.join(WORKLOG_DIR).join(name)
    }

    /// Read a slot file; `None` when it does not exist
    pub fn read_slot(&self, name: &str) -> Result<Option<String>> {
        let path = self.slot_path(name);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WorklogError::Io(e)),
        }
    }

    /// Replace a slot file's content atomically
    pub fn write_slot(&self, name: &str, content: &str) -> Result<()> {
        write_atomic(&self.slot_path(name), content.as_bytes())
    }

    /// Delete a slot file; missing files are fine
    pub fn remove_slot(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.slot_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WorklogError::Io(e)),
        }
    }
}

impl JournalRepository for FileSystemRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn is_initialized(&self) -> bool {
        Self::has_worklog_dir(&self.root)
    }

    fn initialize(&self) -> Result<()> {
        let worklog_dir = self.root.join(WORKLOG_DIR);

        if worklog_dir.exists() {
            return Err(WorklogError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&worklog_dir)?;
        Ok(())
    }
}

/// Best-effort atomic replace: write a temp file next to `path`, then rename
/// it into place.
///
/// On Windows, `rename` does not overwrite existing files, so the destination
/// is removed first.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_name = format!(
        "{}.worklog-tmp-{}",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("slot"),
        std::process::id()
    );
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, content)?;

    if cfg!(windows) && path.exists() {
        fs::remove_file(path)?;
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(WorklogError::Io(e));
    }
    Ok(())
}
