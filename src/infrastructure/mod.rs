//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod drive;
pub mod editor;
pub mod entry_store;
pub mod file_handle;
pub mod repository;
pub mod token;
pub mod workbook;

pub use config::Config;
pub use drive::{DriveClient, RemoteFile};
pub use editor::EditorSession;
pub use entry_store::{EntrySlot, EntryStore, FileSlot, MemorySlot};
pub use file_handle::{FileHandle, HandleSlot};
pub use repository::{FileSystemRepository, JournalRepository};
pub use token::{
    acquire_token, AccessToken, Account, CachedTokenProvider, SessionSlot, TokenProvider,
};
pub use workbook::{Sheet, SpreadsheetXml, WorkbookCodec};
