//! Create and edit entries through the entry form

use crate::domain::dates::{local_today, resolve_date_input};
use crate::domain::entry::new_entry_id;
use crate::domain::Entry;
use crate::error::{Result, WorklogError};
use crate::infrastructure::{EditorSession, EntrySlot, EntryStore};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// Name of the scratch file the editor is opened on
pub const NOTES_SCRATCH: &str = "EDIT_NOTES.txt";

/// Values of the entry form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub date: Option<NaiveDate>,
    pub notes: String,
    /// Id of the entry being edited; `None` creates a new entry
    pub editing: Option<String>,
}

impl EntryForm {
    /// Blank form for a new entry
    pub fn new(date: Option<NaiveDate>) -> Self {
        EntryForm {
            date,
            notes: String::new(),
            editing: None,
        }
    }

    /// Form pre-filled from an existing entry
    pub fn start_edit(entry: &Entry) -> Self {
        EntryForm {
            date: entry.date(),
            notes: entry.notes.clone(),
            editing: Some(entry.id.clone()),
        }
    }

    /// Validate, then create or update the entry
    pub fn submit<S: EntrySlot>(&self, store: &EntryStore<S>, now: i64) -> Result<Entry> {
        let date = self
            .date
            .ok_or_else(|| WorklogError::Validation("Please choose a date.".to_string()))?;
        let notes = self.notes.trim();
        if notes.is_empty() {
            return Err(WorklogError::Validation(
                "Please enter your work details.".to_string(),
            ));
        }

        let id = match &self.editing {
            Some(id) => id.clone(),
            None => fresh_id(store, now),
        };
        let entry = Entry::new(id, date, notes.to_string(), now);
        store.upsert(entry.clone())?;
        info!(id = %entry.id, date = %entry.date_iso, "Saved entry");
        Ok(entry)
    }
}

/// `e_<now>`, with a random suffix if that id is already taken
fn fresh_id<S: EntrySlot>(store: &EntryStore<S>, now: i64) -> String {
    let id = new_entry_id(now);
    if store.load().iter().any(|e| e.id == id) {
        let suffix = Uuid::new_v4().simple().to_string();
        debug!(%id, "Entry id taken; adding suffix");
        return format!("{}_{}", id, &suffix[..6]);
    }
    id
}

/// Resolve an optional date argument; blank means no date was chosen
pub fn form_date(input: Option<&str>, today: NaiveDate) -> Result<Option<NaiveDate>> {
    match input {
        None => Ok(Some(today)),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => resolve_date_input(text, today).map(Some),
    }
}

/// Service recording entries from command-line input
pub struct EntryFormService<'a, S: EntrySlot> {
    store: &'a EntryStore<S>,
    editor: EditorSession,
    scratch: &'a Path,
}

impl<'a, S: EntrySlot> EntryFormService<'a, S> {
    pub fn new(store: &'a EntryStore<S>, editor: EditorSession, scratch: &'a Path) -> Self {
        EntryFormService {
            store,
            editor,
            scratch,
        }
    }

    /// New entry for `date` (default today); notes come from the editor
    /// when not given
    pub fn add(&self, date: Option<&str>, notes: Option<String>, now: i64) -> Result<Entry> {
        let mut form = EntryForm::new(form_date(date, local_today())?);
        form.notes = match notes {
            Some(notes) => notes,
            None => self.editor.compose(self.scratch, "")?,
        };
        form.submit(self.store, now)
    }

    /// Update the entry `id`, keeping fields that are not given
    pub fn edit(
        &self,
        id: &str,
        date: Option<&str>,
        notes: Option<String>,
        now: i64,
    ) -> Result<Entry> {
        let entry = self
            .store
            .load()
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| WorklogError::EntryNotFound(id.to_string()))?;

        let mut form = EntryForm::start_edit(&entry);
        if let Some(date) = date {
            form.date = form_date(Some(date), local_today())?;
        }
        let edit_in_editor = notes.is_none() && date.is_none();
        if let Some(notes) = notes {
            form.notes = notes;
        } else if edit_in_editor {
            form.notes = self.editor.compose(self.scratch, &form.notes)?;
        }
        form.submit(self.store, now)
    }
}
