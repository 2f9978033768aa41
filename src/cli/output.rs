//! Output formatting utilities

use crate::domain::dates::{display_date, format_timestamp};
use crate::domain::query::highlight;
use crate::domain::{Entry, QueryResult};
use chrono::TimeZone;
use std::fmt::Display;

const MATCH_START: &str = "\x1b[1;33m";
const MATCH_END: &str = "\x1b[0m";

/// How list output marks search matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Ansi,
    Plain,
}

/// Summary line, then one row per visible entry (up to `limit`)
pub fn format_entry_list(
    result: &QueryResult,
    query: &str,
    limit: Option<usize>,
    style: Highlight,
) -> String {
    let mut output = format!("{}\n", result.summary());
    if result.visible.is_empty() {
        output.push_str("No entries found\n");
        return output;
    }

    let shown = limit.unwrap_or(result.visible.len());
    for entry in result.visible.iter().take(shown) {
        output.push_str(&format_row(entry, query, style));
        output.push('\n');
    }
    if shown < result.visible.len() {
        output.push_str(&format!("... {} more\n", result.visible.len() - shown));
    }
    output
}

fn format_row(entry: &Entry, query: &str, style: Highlight) -> String {
    let mut headline = entry.headline().to_string();
    let extra_lines = entry.notes.lines().count().saturating_sub(1);
    if extra_lines > 0 {
        headline.push_str(&format!(" (+{} lines)", extra_lines));
    }
    let headline = match style {
        Highlight::Ansi => highlight(&headline, query, MATCH_START, MATCH_END),
        Highlight::Plain => headline,
    };
    format!(
        "{}  {:<9}  {}  {}",
        entry.date_iso, entry.day, entry.id, headline
    )
}

/// Full entry: title, last-updated line, blank line, notes
pub fn format_entry_view<Tz>(entry: &Entry, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{} ({})\nLast updated {}\n\n{}\n",
        display_date(&entry.date_iso),
        entry.day,
        format_timestamp(entry.last_updated, tz),
        entry.notes
    )
}
