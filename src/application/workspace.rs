//! An opened journal: its repository, config and entry store

use crate::error::Result;
use crate::infrastructure::{Config, EntryStore, FileSlot, FileSystemRepository, JournalRepository};

/// Everything a command needs from the journal directory
pub struct Workspace {
    pub repository: FileSystemRepository,
    pub config: Config,
    pub store: EntryStore<FileSlot>,
}

impl Workspace {
    /// Open the journal rooted at `repository`
    pub fn open(repository: FileSystemRepository) -> Result<Self> {
        let config = repository.load_config()?;
        let store = EntryStore::new(
            FileSlot::new(repository.clone()),
            config.storage.quota_bytes,
        );
        Ok(Workspace {
            repository,
            config,
            store,
        })
    }

    /// Open the journal found from the environment or the current directory
    pub fn discover() -> Result<Self> {
        Self::open(FileSystemRepository::discover()?)
    }
}
