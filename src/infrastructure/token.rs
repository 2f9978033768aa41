//! Cloud sign-in state and access tokens
//!
//! Token acquisition is opaque to the rest of the crate: a [`TokenProvider`]
//! is asked silently first and interactively only when that yields nothing.

use crate::error::{Result, WorklogError};
use crate::infrastructure::FileSystemRepository;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::IsTerminal;
use tracing::{debug, warn};

const SESSION_SLOT: &str = "session.toml";

/// Environment variable consulted before the cached token
pub const TOKEN_ENV: &str = "WORKLOG_ACCESS_TOKEN";

/// The signed-in cloud account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
}

impl Account {
    pub fn new(username: &str) -> Self {
        Account {
            username: username.to_string(),
        }
    }
}

/// Bearer token; never printed
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: String) -> Self {
        AccessToken(token)
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Source of access tokens for an account
pub trait TokenProvider {
    /// Token obtainable without user interaction, if any
    fn acquire_silent(&self, account: &Account) -> Result<Option<AccessToken>>;

    /// Token obtained by asking the user
    fn acquire_interactive(&self, account: &Account) -> Result<AccessToken>;
}

/// Silent acquisition first, interactive on a miss or a silent failure
pub fn acquire_token<P: TokenProvider + ?Sized>(
    provider: &P,
    account: &Account,
) -> Result<AccessToken> {
    match provider.acquire_silent(account) {
        Ok(Some(token)) => return Ok(token),
        Ok(None) => debug!("No cached token; asking interactively"),
        Err(e) => debug!("Silent token acquisition failed: {}", e),
    }
    provider.acquire_interactive(account)
}

/// Persisted sign-in state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub account: Option<String>,
    pub access_token: Option<String>,
}

/// `.worklog/session.toml`
#[derive(Debug, Clone)]
pub struct SessionSlot {
    repository: FileSystemRepository,
}

impl SessionSlot {
    pub fn new(repository: FileSystemRepository) -> Self {
        SessionSlot { repository }
    }

    /// Stored record; unreadable or malformed slots are signed out
    pub fn load(&self) -> SessionRecord {
        let raw = match self.repository.read_slot(SESSION_SLOT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SessionRecord::default(),
            Err(e) => {
                warn!("Failed to read {}: {}", SESSION_SLOT, e);
                return SessionRecord::default();
            }
        };
        toml::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring malformed {}: {}", SESSION_SLOT, e);
            SessionRecord::default()
        })
    }

    pub fn save(&self, record: &SessionRecord) -> Result<()> {
        self.repository
            .write_slot(SESSION_SLOT, &toml::to_string_pretty(record)?)
    }

    pub fn clear(&self) -> Result<()> {
        self.repository.remove_slot(SESSION_SLOT)
    }

    pub fn account(&self) -> Option<Account> {
        self.load().account.as_deref().map(Account::new)
    }
}

/// Token provider backed by the environment, the session slot and a
/// terminal prompt
pub struct CachedTokenProvider {
    slot: SessionSlot,
    env_token: Option<String>,
    interactive: bool,
}

impl CachedTokenProvider {
    pub fn new(slot: SessionSlot) -> Self {
        CachedTokenProvider {
            slot,
            env_token: std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty()),
            interactive: std::io::stdin().is_terminal(),
        }
    }
}

impl TokenProvider for CachedTokenProvider {
    fn acquire_silent(&self, account: &Account) -> Result<Option<AccessToken>> {
        if let Some(token) = &self.env_token {
            return Ok(Some(AccessToken::new(token.clone())));
        }
        let record = self.slot.load();
        if record.account.as_deref() != Some(account.username.as_str()) {
            return Ok(None);
        }
        Ok(record.access_token.map(AccessToken::new))
    }

    fn acquire_interactive(&self, account: &Account) -> Result<AccessToken> {
        if !self.interactive {
            return Err(WorklogError::Auth(format!(
                "no terminal to sign in {}; set {}",
                account.username, TOKEN_ENV
            )));
        }
        let token = dialoguer::Password::new()
            .with_prompt(format!("Access token for {}", account.username))
            .interact()
            .map_err(|e| WorklogError::Auth(format!("Sign-in canceled or failed: {}", e)))?;

        self.slot.save(&SessionRecord {
            account: Some(account.username.clone()),
            access_token: Some(token.clone()),
        })?;
        Ok(AccessToken::new(token))
    }
}
