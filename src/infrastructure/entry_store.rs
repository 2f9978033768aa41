//! Durable entry collection
//!
//! The whole collection lives in one slot as a JSON array and is always
//! read-modify-written wholesale. Reads never fail: a missing, unreadable or
//! non-array slot is an empty collection.

use crate::domain::{Entry, RawEntry};
use crate::error::{Result, WorklogError};
use crate::infrastructure::FileSystemRepository;
use chrono::Utc;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Name of the entry slot inside .worklog
pub const ENTRIES_SLOT: &str = "entries.json";

/// A single named persisted value
pub trait EntrySlot {
    /// Current payload, `None` when nothing was ever written
    fn read(&self) -> Result<Option<String>>;

    /// Replace the payload
    fn write(&self, payload: &str) -> Result<()>;
}

/// Slot backed by `.worklog/entries.json`
#[derive(Debug, Clone)]
pub struct FileSlot {
    repository: FileSystemRepository,
}

impl FileSlot {
    pub fn new(repository: FileSystemRepository) -> Self {
        FileSlot { repository }
    }
}

impl EntrySlot for FileSlot {
    fn read(&self) -> Result<Option<String>> {
        self.repository.read_slot(ENTRIES_SLOT)
    }

    fn write(&self, payload: &str) -> Result<()> {
        self.repository.write_slot(ENTRIES_SLOT, payload)
    }
}

/// In-memory slot for tests
#[derive(Debug, Default)]
pub struct MemorySlot {
    payload: RefCell<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: &str) -> Self {
        MemorySlot {
            payload: RefCell::new(Some(payload.to_string())),
        }
    }

    pub fn payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }
}

impl EntrySlot for MemorySlot {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.payload.borrow().clone())
    }

    fn write(&self, payload: &str) -> Result<()> {
        *self.payload.borrow_mut() = Some(payload.to_string());
        Ok(())
    }
}

/// Owner of the entry collection
pub struct EntryStore<S: EntrySlot> {
    slot: S,
    quota_bytes: usize,
}

impl<S: EntrySlot> EntryStore<S> {
    pub fn new(slot: S, quota_bytes: usize) -> Self {
        EntryStore { slot, quota_bytes }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Stored collection in storage order; empty on any failure
    pub fn load(&self) -> Vec<Entry> {
        let raw = match self.slot.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to load entries: {}", e);
                return Vec::new();
            }
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to load entries: {}", e);
                return Vec::new();
            }
        };

        let Value::Array(items) = parsed else {
            warn!("Stored entries are not a list; treating as empty");
            return Vec::new();
        };

        let now = Utc::now().timestamp_millis();
        items
            .into_iter()
            .filter_map(|item| stored_entry(item, now))
            .collect()
    }

    /// Persist the full collection, replacing prior content
    pub fn save(&self, entries: &[Entry]) -> Result<()> {
        let payload = serde_json::to_string(entries)?;
        if payload.len() > self.quota_bytes {
            warn!(
                size = payload.len(),
                quota = self.quota_bytes,
                "Entry store quota exceeded"
            );
            return Err(WorklogError::StorageFull {
                size: payload.len(),
                quota: self.quota_bytes,
            });
        }

        self.slot.write(&payload).map_err(|e| {
            warn!("Failed to save entries: {}", e);
            WorklogError::SaveFailed(e.to_string())
        })?;
        debug!(count = entries.len(), "Saved entries");
        Ok(())
    }

    /// Replace the entry with the same id, or append it
    pub fn upsert(&self, entry: Entry) -> Result<Vec<Entry>> {
        let mut entries = self.load();
        match entries.iter().position(|e| e.id == entry.id) {
            Some(index) => entries[index] = entry,
            None => entries.push(entry),
        }
        self.save(&entries)?;
        Ok(entries)
    }

    /// Remove every entry with `id`
    pub fn delete(&self, id: &str) -> Result<Vec<Entry>> {
        let mut entries = self.load();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            debug!(id, "Delete matched no entry");
            return Ok(entries);
        }
        self.save(&entries)?;
        Ok(entries)
    }

    /// Normalize loose records and replace the whole collection with them.
    ///
    /// Records without a date or notes are dropped; a repeated id keeps its
    /// first occurrence.
    pub fn import_replace(&self, raw_list: Vec<RawEntry>, now: i64) -> Result<Vec<Entry>> {
        let received = raw_list.len();
        let mut seen = HashSet::new();
        let entries: Vec<Entry> = raw_list
            .iter()
            .filter_map(|raw| raw.normalize(now))
            .filter(|entry| seen.insert(entry.id.clone()))
            .collect();

        if entries.len() < received {
            debug!(
                dropped = received - entries.len(),
                "Dropped malformed import records"
            );
        }

        self.save(&entries)?;
        info!(count = entries.len(), "Imported entries");
        Ok(entries)
    }
}

/// Read one stored element, falling back to import coercion for records
/// written loosely (float timestamps, missing day or id).
fn stored_entry(item: Value, now: i64) -> Option<Entry> {
    match serde_json::from_value::<Entry>(item.clone()) {
        Ok(entry) => Some(entry),
        Err(strict) => {
            let entry = RawEntry::from(item).normalize(now);
            match &entry {
                Some(entry) => debug!(id = %entry.id, "Coerced loose stored entry"),
                None => warn!("Skipping unreadable stored entry: {}", strict),
            }
            entry
        }
    }
}

/// Split a parsed import document into raw records.
///
/// Anything but a top-level array is rejected as a whole.
pub fn raw_entries_from_json(document: Value) -> Result<Vec<RawEntry>> {
    match document {
        Value::Array(items) => Ok(items.into_iter().map(RawEntry::from).collect()),
        other => Err(WorklogError::InvalidImport(format!(
            "expected a list of entries, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
