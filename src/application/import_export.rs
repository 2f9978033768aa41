//! Text and JSON export, JSON import

use crate::domain::tabular::ascending_snapshot;
use crate::domain::transcript::{render_transcript, transcript_filename};
use crate::error::{Result, WorklogError};
use crate::infrastructure::entry_store::raw_entries_from_json;
use crate::infrastructure::repository::write_atomic;
use crate::infrastructure::{EntrySlot, EntryStore};
use chrono::{DateTime, TimeZone};
use serde_json::Value;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where an export went and how many entries it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Records in the file
    pub received: usize,
    /// Records kept after normalization
    pub kept: usize,
}

/// Default file name for a JSON export made on `date_iso`
pub fn json_export_filename(date_iso: &str) -> String {
    format!("daily-work-tracker-{}.json", date_iso)
}

/// Write the plain-text transcript, oldest entry first
pub fn export_text<S, Tz>(
    store: &EntryStore<S>,
    generated_at: &DateTime<Tz>,
    output: Option<&Path>,
) -> Result<ExportReport>
where
    S: EntrySlot,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let snapshot = ascending_snapshot(&store.load());
    let path = output.map(Path::to_path_buf).unwrap_or_else(|| {
        PathBuf::from(transcript_filename(
            &generated_at.date_naive().format("%Y-%m-%d").to_string(),
        ))
    });

    write_atomic(&path, render_transcript(&snapshot, generated_at).as_bytes())?;
    info!(path = %path.display(), count = snapshot.len(), "Exported transcript");
    Ok(ExportReport {
        path,
        count: snapshot.len(),
    })
}

/// Write the stored collection as pretty JSON, in storage order
pub fn export_json<S: EntrySlot>(
    store: &EntryStore<S>,
    date_iso: &str,
    output: Option<&Path>,
) -> Result<ExportReport> {
    let entries = store.load();
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(json_export_filename(date_iso)));

    write_atomic(&path, serde_json::to_string_pretty(&entries)?.as_bytes())?;
    info!(path = %path.display(), count = entries.len(), "Exported JSON");
    Ok(ExportReport {
        path,
        count: entries.len(),
    })
}

/// Replace the whole collection with the records in a JSON file
pub fn import_json<S: EntrySlot>(
    store: &EntryStore<S>,
    path: &Path,
    now: i64,
) -> Result<ImportReport> {
    let content = fs::read_to_string(path).map_err(|e| {
        debug!("Cannot read {}: {}", path.display(), e);
        WorklogError::InvalidImport(e.to_string())
    })?;
    let document: Value = serde_json::from_str(&content).map_err(|e| {
        debug!("Cannot parse {}: {}", path.display(), e);
        WorklogError::InvalidImport(e.to_string())
    })?;

    let raw = raw_entries_from_json(document)?;
    let received = raw.len();
    let kept = store.import_replace(raw, now)?.len();
    Ok(ImportReport { received, kept })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Entry;
    use crate::infrastructure::MemorySlot;
    use chrono::Utc;
    use tempfile::TempDir;

    fn entry(id: &str, date_iso: &str, day: &str, notes: &str, last_updated: i64) -> Entry {
        Entry {
            id: id.to_string(),
            date_iso: date_iso.to_string(),
            day: day.to_string(),
            notes: notes.to_string(),
            last_updated,
        }
    }

    fn store() -> EntryStore<MemorySlot> {
        let store = EntryStore::new(MemorySlot::new(), 1024 * 1024);
        store
            .save(&[
                entry("b", "2024-01-03", "Wednesday", "fixed bug", 2),
                entry("a", "2024-01-01", "Monday", "standup\nreview", 1),
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_text_export_is_ascending() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out.txt");
        let at = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();

        let report = export_text(&store(), &at, Some(&out)).unwrap();
        assert_eq!(report.count, 2);

        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("Daily Work Tracker export - 2024-01-05 09:00:00\r\n"));
        let first = text.find("Date: 2024-01-01 (Monday)").unwrap();
        let second = text.find("Date: 2024-01-03 (Wednesday)").unwrap();
        assert!(first < second);
        assert!(text.contains("standup\r\nreview"));
    }

    #[test]
    fn test_json_round_trip_preserves_entries() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("export.json");
        let source = store();

        export_json(&source, "2024-01-05", Some(&out)).unwrap();

        let target = EntryStore::new(MemorySlot::new(), 1024 * 1024);
        let report = import_json(&target, &out, 99).unwrap();
        assert_eq!(report, ImportReport { received: 2, kept: 2 });
        assert_eq!(target.load(), source.load());
    }

    #[test]
    fn test_import_rejects_non_array_and_keeps_store() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("bad.json");
        fs::write(&file, r#"{"dateISO":"2024-02-01","notes":"x"}"#).unwrap();
        let store = store();

        assert!(matches!(
            import_json(&store, &file, 1),
            Err(WorklogError::InvalidImport(_))
        ));
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn test_import_rejects_unparseable_and_missing_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("bad.json");
        fs::write(&file, "not json").unwrap();
        let store = store();

        assert!(matches!(
            import_json(&store, &file, 1),
            Err(WorklogError::InvalidImport(_))
        ));
        assert!(matches!(
            import_json(&store, &temp.path().join("missing.json"), 1),
            Err(WorklogError::InvalidImport(_))
        ));
    }

    #[test]
    fn test_import_drops_incomplete_records() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("in.json");
        fs::write(
            &file,
            r#"[{"dateISO":"2024-02-01","notes":"x"},{"dateISO":"","notes":"y"}]"#,
        )
        .unwrap();
        let store = store();

        let report = import_json(&store, &file, 1_706_745_600_000).unwrap();
        assert_eq!(report, ImportReport { received: 2, kept: 1 });
        let entries = store.load();
        assert_eq!(entries[0].day, "Thursday");
        assert!(entries[0].id.starts_with("e_1706745600000_"));
    }

    #[test]
    fn test_default_file_names() {
        assert_eq!(
            json_export_filename("2024-01-05"),
            "daily-work-tracker-2024-01-05.json"
        );
    }
}
