//! Delete and look up single entries

use crate::domain::Entry;
use crate::error::{Result, WorklogError};
use crate::infrastructure::{EntrySlot, EntryStore};
use tracing::info;

/// Outcome of a delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(Entry),
    /// The user declined the confirmation; nothing changed
    Declined,
}

/// The stored entry with `id`
pub fn find_entry<S: EntrySlot>(store: &EntryStore<S>, id: &str) -> Result<Entry> {
    store
        .load()
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| WorklogError::EntryNotFound(id.to_string()))
}

/// Delete `id` after `confirm` agrees
pub fn delete_entry<S, F>(store: &EntryStore<S>, id: &str, confirm: F) -> Result<DeleteOutcome>
where
    S: EntrySlot,
    F: FnOnce(&Entry) -> Result<bool>,
{
    let entry = find_entry(store, id)?;
    if !confirm(&entry)? {
        return Ok(DeleteOutcome::Declined);
    }
    store.delete(id)?;
    info!(id, "Deleted entry");
    Ok(DeleteOutcome::Deleted(entry))
}
