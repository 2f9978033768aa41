//! Application layer - Use cases and orchestration

pub mod cloud_sync;
pub mod entry_form;
pub mod import_export;
pub mod init;
pub mod list_entries;
pub mod manage_config;
pub mod remove_entry;
pub mod session;
pub mod spreadsheet;
pub mod workspace;

pub use cloud_sync::{CloudSyncService, SyncReport};
pub use entry_form::{EntryForm, EntryFormService};
pub use list_entries::{list_entries, ViewCommand, ViewState};
pub use remove_entry::{delete_entry, find_entry, DeleteOutcome};
pub use session::Session;
pub use spreadsheet::{SaveTarget, SpreadsheetService};
pub use workspace::Workspace;
