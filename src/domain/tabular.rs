//! Fixed five-column projection of entries, shared by the spreadsheet and
//! cloud CSV adapters

use crate::domain::Entry;

/// Column order for every tabular export
pub const COLUMNS: [&str; 5] = ["dateISO", "day", "notes", "lastUpdated", "id"];

/// Cells of one entry, in [`COLUMNS`] order
pub fn row(entry: &Entry) -> [String; 5] {
    [
        entry.date_iso.clone(),
        entry.day.clone(),
        entry.notes.clone(),
        entry.last_updated.to_string(),
        entry.id.clone(),
    ]
}

/// Copy of `entries` ordered by date, then last update, ascending
pub fn ascending_snapshot(entries: &[Entry]) -> Vec<Entry> {
    let mut snapshot = entries.to_vec();
    snapshot.sort_by(|a, b| {
        a.date_iso
            .cmp(&b.date_iso)
            .then(a.last_updated.cmp(&b.last_updated))
    });
    snapshot
}

/// Header-only CSV used when the remote file is first created
pub fn csv_header() -> String {
    format!("{}\n", COLUMNS.join(","))
}

/// Quote a field containing a comma, quote or newline; inner quotes doubled
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Header plus one line per entry, joined with `\n`
pub fn to_csv(entries: &[Entry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(COLUMNS.join(","));
    for entry in entries {
        let cells: Vec<String> = row(entry).iter().map(|cell| csv_field(cell)).collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}
