//! Per-run context restored from the journal directory

use crate::infrastructure::{
    Account, Config, FileHandle, FileSystemRepository, HandleSlot, SessionSlot,
};
use tracing::{debug, info};

/// Signed-in account and selected spreadsheet, passed to the adapters that
/// need them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub account: Option<Account>,
    pub spreadsheet: Option<FileHandle>,
}

impl Session {
    /// Restore the account from the session slot and the remembered
    /// spreadsheet from the handle slot.
    ///
    /// The spreadsheet is only restored while persistent handles are enabled
    /// and its write permission still holds.
    pub fn restore(repository: &FileSystemRepository, config: &Config) -> Self {
        let account = SessionSlot::new(repository.clone()).account();

        let spreadsheet = if config.spreadsheet.persistent_handles {
            HandleSlot::new(repository.clone())
                .get()
                .filter(|handle| {
                    let granted = handle.ensure_write_permission();
                    if !granted {
                        info!(
                            "Remembered spreadsheet {} is not writable; ignoring it",
                            handle.path.display()
                        );
                    }
                    granted
                })
        } else {
            None
        };

        debug!(
            signed_in = account.is_some(),
            spreadsheet = spreadsheet.is_some(),
            "Restored session"
        );
        Session {
            account,
            spreadsheet,
        }
    }
}
