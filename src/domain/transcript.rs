//! Plain-text export transcript

use crate::domain::dates::format_timestamp;
use crate::domain::Entry;
use chrono::{DateTime, TimeZone};

const TITLE: &str = "Daily Work Tracker export";

/// Render entries as a CRLF transcript, one block per entry.
///
/// Entries are written in the order given; callers pass an ascending
/// snapshot. Timestamps are shown in the zone of `generated_at`.
pub fn render_transcript<Tz: TimeZone>(entries: &[Entry], generated_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let tz = generated_at.timezone();
    let mut lines: Vec<String> = vec![
        format!(
            "{} - {}",
            TITLE,
            generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
        String::new(),
    ];

    for entry in entries {
        lines.push(format!("Date: {} ({})", entry.date_iso, entry.day));
        lines.push("Notes:".to_string());
        lines.extend(
            entry
                .notes
                .split('\n')
                .map(|row| row.strip_suffix('\r').unwrap_or(row).to_string()),
        );
        lines.push(format!(
            "Last updated: {}",
            format_timestamp(entry.last_updated, &tz)
        ));
        lines.push("---".to_string());
        lines.push(String::new());
    }

    lines.join("\r\n")
}

/// Default download name for a transcript generated on `date_iso`
pub fn transcript_filename(date_iso: &str) -> String {
    format!("daily-work-tracker-{}.txt", date_iso)
}
