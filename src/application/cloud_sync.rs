//! Cloud sign-in and CSV sync

use crate::application::session::Session;
use crate::domain::tabular::{ascending_snapshot, to_csv};
use crate::domain::Entry;
use crate::error::{Result, WorklogError};
use crate::infrastructure::token::SessionRecord;
use crate::infrastructure::{
    acquire_token, Account, DriveClient, RemoteFile, SessionSlot, TokenProvider,
};
use chrono::Local;
use tracing::{error, info};

/// Result of a successful sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub file_name: String,
    pub created: bool,
    pub rows: usize,
    /// Local completion time, `HH:MM:SS`
    pub at: String,
}

impl SyncReport {
    pub fn status_line(&self) -> String {
        format!("Synced to OneDrive: {} at {}", self.file_name, self.at)
    }
}

pub struct CloudSyncService<P: TokenProvider> {
    slot: SessionSlot,
    provider: P,
}

impl<P: TokenProvider> CloudSyncService<P> {
    pub fn new(slot: SessionSlot, provider: P) -> Self {
        CloudSyncService { slot, provider }
    }

    /// Obtain a token for `username` and record the account
    pub fn sign_in(&self, username: &str) -> Result<Account> {
        let account = Account::new(username.trim());
        if account.username.is_empty() {
            return Err(WorklogError::Validation(
                "Please enter an account name.".to_string(),
            ));
        }
        acquire_token(&self.provider, &account)?;

        // Keep a token cached for this account; drop one left by another
        let mut record = self.slot.load();
        if record.account.as_deref() != Some(account.username.as_str()) {
            record = SessionRecord {
                account: Some(account.username.clone()),
                access_token: None,
            };
        }
        self.slot.save(&record)?;
        info!(account = %account.username, "Signed in");
        Ok(account)
    }

    pub fn sign_out(&self) -> Result<()> {
        self.slot.clear()?;
        info!("Signed out");
        Ok(())
    }

    pub fn status(&self) -> Option<Account> {
        self.slot.account()
    }

    /// Upload the full CSV snapshot, creating the remote file first if
    /// needed. No retries.
    pub fn sync(
        &self,
        client: &DriveClient,
        file_name: &str,
        entries: &[Entry],
        session: &Session,
    ) -> Result<SyncReport> {
        self.try_sync(client, file_name, entries, session)
            .inspect_err(|e| error!("Sync failed: {}", e))
    }

    fn try_sync(
        &self,
        client: &DriveClient,
        file_name: &str,
        entries: &[Entry],
        session: &Session,
    ) -> Result<SyncReport> {
        let account = session.account.as_ref().ok_or(WorklogError::NotSignedIn)?;
        let token = acquire_token(&self.provider, account).map_err(|e| match e {
            WorklogError::Auth(msg) => WorklogError::Cloud(format!("no access token: {}", msg)),
            other => other,
        })?;

        let remote = client.ensure_file(&token, file_name)?;
        let snapshot = ascending_snapshot(entries);
        client.upload(&token, file_name, to_csv(&snapshot))?;

        let report = SyncReport {
            file_name: file_name.to_string(),
            created: remote == RemoteFile::Created,
            rows: snapshot.len(),
            at: Local::now().format("%H:%M:%S").to_string(),
        };
        info!(file_name, rows = report.rows, "Synced");
        Ok(report)
    }
}
