//! Entry query pipeline: sort, filter and summarize
//!
//! [`run_query`] is a pure function of the stored entries, a [`FilterSpec`]
//! and a [`SortMode`]. The full collection is sorted first and the filter then
//! selects from the sorted sequence, so the visible subset keeps sort order
//! and the total count never depends on the filter.
//!
//! # Examples
//!
//! ```
//! use worklog::domain::query::{run_query, FilterSpec, SortMode};
//!
//! let filter = FilterSpec::default().with_query("bug");
//! let result = run_query(Vec::new(), &filter, SortMode::Newest);
//! assert_eq!(result.total, 0);
//! assert_eq!(result.summary(), "0 entries");
//! ```

use crate::domain::dates::parse_iso_date;
use crate::domain::Entry;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::RegexBuilder;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Which entries are visible
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Free text, matched case-insensitively against notes, date and weekday
    pub query: String,
    /// Inclusive lower bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound
    pub to: Option<NaiveDate>,
    /// Active three-letter weekday codes ("Mon"); empty means every day
    pub weekdays: BTreeSet<String>,
}

impl FilterSpec {
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    pub fn with_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_weekday(mut self, code: &str) -> Self {
        self.weekdays.insert(code.to_string());
        self
    }

    /// Query text as matched and highlighted
    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }

    /// Whether a single entry passes every criterion
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(instant) = parse_iso_date(&entry.date_iso).map(midday) {
            if self.from.is_some_and(|from| instant < start_of_day(from)) {
                return false;
            }
            if self.to.is_some_and(|to| instant > end_of_day(to)) {
                return false;
            }
        }

        if !self.weekdays.is_empty() {
            let short: String = entry.day.chars().take(3).collect();
            if !self.weekdays.contains(&short) {
                return false;
            }
        }

        let needle = self.trimmed_query().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let haystack = format!("{} {} {}", entry.notes, entry.date_iso, entry.day).to_lowercase();
        haystack.contains(&needle)
    }
}

// An entry is compared at noon so it never straddles the `to` bound's
// end-of-day instant.
fn midday(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

/// Ordering of the entry list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Date descending, then most recently updated first
    #[default]
    Newest,
    /// Date ascending, then least recently updated first
    Oldest,
    /// Most recently updated first, regardless of date
    Updated,
}

impl SortMode {
    pub fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        match self {
            SortMode::Newest => b
                .date_iso
                .cmp(&a.date_iso)
                .then(b.last_updated.cmp(&a.last_updated)),
            SortMode::Oldest => a
                .date_iso
                .cmp(&b.date_iso)
                .then(a.last_updated.cmp(&b.last_updated)),
            SortMode::Updated => b.last_updated.cmp(&a.last_updated),
        }
    }

    /// Stable in-place sort
    pub fn sort(&self, entries: &mut [Entry]) {
        entries.sort_by(|a, b| self.compare(a, b));
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "updated" => Ok(SortMode::Updated),
            _ => Err(format!(
                "Invalid sort mode: '{}'. Valid modes are: newest, oldest, updated",
                s
            )),
        }
    }
}

/// Visible subset plus counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub visible: Vec<Entry>,
    /// Size of the sorted full collection
    pub total: usize,
}

impl QueryResult {
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// "3 entries" when nothing is filtered out, otherwise "1 of 3 entries"
    pub fn summary(&self) -> String {
        let count = self.visible_count();
        if count == self.total {
            format!("{} entries", count)
        } else {
            format!("{} of {} entries", count, self.total)
        }
    }
}

/// Sort the full collection, then keep the entries the filter accepts
pub fn run_query(mut entries: Vec<Entry>, filter: &FilterSpec, sort: SortMode) -> QueryResult {
    sort.sort(&mut entries);
    let total = entries.len();
    let visible = entries.into_iter().filter(|e| filter.matches(e)).collect();
    QueryResult { visible, total }
}

/// Wrap every case-insensitive literal occurrence of `query` in `open`/`close`
pub fn highlight(text: &str, query: &str, open: &str, close: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        return text.to_string();
    }
    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re
            .replace_all(text, |caps: &regex::Captures<'_>| {
                format!("{}{}{}", open, &caps[0], close)
            })
            .into_owned(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, date_iso: &str, day: &str, notes: &str, last_updated: i64) -> Entry {
        Entry {
            id: id.to_string(),
            date_iso: date_iso.to_string(),
            day: day.to_string(),
            notes: notes.to_string(),
            last_updated,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry("a", "2024-01-01", "Monday", "wrote report", 10),
            entry("b", "2024-01-03", "Wednesday", "fixed bug", 20),
        ]
    }

    fn ids(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_query_bug_scenario() {
        let result = run_query(
            sample(),
            &FilterSpec::default().with_query("bug"),
            SortMode::Newest,
        );
        assert_eq!(ids(&result.visible), vec!["b"]);
        assert_eq!(result.total, 2);
        assert_eq!(result.visible_count(), 1);
        assert_eq!(result.summary(), "1 of 2 entries");
    }

    #[test]
    fn test_query_is_case_insensitive_and_trimmed() {
        let filter = FilterSpec::default().with_query("  WROTE ");
        let result = run_query(sample(), &filter, SortMode::Newest);
        assert_eq!(ids(&result.visible), vec!["a"]);
    }

    #[test]
    fn test_query_matches_date_and_weekday() {
        let by_date = FilterSpec::default().with_query("2024-01-03");
        assert_eq!(
            ids(&run_query(sample(), &by_date, SortMode::Newest).visible),
            vec!["b"]
        );

        let by_day = FilterSpec::default().with_query("monday");
        assert_eq!(
            ids(&run_query(sample(), &by_day, SortMode::Newest).visible),
            vec!["a"]
        );
    }

    #[test]
    fn test_weekday_filter_excludes_other_days() {
        let filter = FilterSpec::default().with_weekday("Mon");
        let result = run_query(sample(), &filter, SortMode::Newest);
        assert_eq!(ids(&result.visible), vec!["a"]);
    }

    #[test]
    fn test_weekday_codes_are_case_sensitive() {
        let filter = FilterSpec::default().with_weekday("mon");
        let result = run_query(sample(), &filter, SortMode::Newest);
        assert!(result.visible.is_empty());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let entries = vec![
            entry("a", "2024-01-10", "Wednesday", "x", 1),
            entry("b", "2024-01-15", "Monday", "x", 1),
            entry("c", "2024-01-20", "Saturday", "x", 1),
        ];
        let filter =
            FilterSpec::default().with_range(Some(date(2024, 1, 10)), Some(date(2024, 1, 15)));
        let result = run_query(entries, &filter, SortMode::Oldest);
        assert_eq!(ids(&result.visible), vec!["a", "b"]);
        assert_eq!(result.total, 3);
    }

    #[test]
    fn test_open_ended_ranges() {
        let entries = vec![
            entry("a", "2024-01-10", "Wednesday", "x", 1),
            entry("b", "2024-01-20", "Saturday", "x", 1),
        ];
        let from_only = FilterSpec::default().with_range(Some(date(2024, 1, 15)), None);
        assert_eq!(
            ids(&run_query(entries.clone(), &from_only, SortMode::Oldest).visible),
            vec!["b"]
        );
        let to_only = FilterSpec::default().with_range(None, Some(date(2024, 1, 15)));
        assert_eq!(
            ids(&run_query(entries, &to_only, SortMode::Oldest).visible),
            vec!["a"]
        );
    }

    #[test]
    fn test_range_never_returns_outside_entries() {
        let entries: Vec<Entry> = (1..=28)
            .map(|d| entry(&d.to_string(), &format!("2024-02-{:02}", d), "", "x", d as i64))
            .collect();
        let (from, to) = (date(2024, 2, 5), date(2024, 2, 9));
        let filter = FilterSpec::default().with_range(Some(from), Some(to));
        let result = run_query(entries, &filter, SortMode::Newest);
        assert_eq!(result.visible_count(), 5);
        for e in &result.visible {
            let d = e.date().unwrap();
            assert!(d >= from && d <= to, "{} outside range", e.date_iso);
        }
    }

    #[test]
    fn test_unparseable_dates_are_not_range_filtered() {
        let entries = vec![entry("a", "someday", "", "x", 1)];
        let filter =
            FilterSpec::default().with_range(Some(date(2024, 1, 1)), Some(date(2024, 1, 2)));
        assert_eq!(run_query(entries, &filter, SortMode::Newest).visible_count(), 1);
    }

    #[test]
    fn test_sort_newest_breaks_ties_by_last_updated() {
        let entries = vec![
            entry("old", "2024-01-01", "Monday", "x", 1),
            entry("same-early", "2024-01-05", "Friday", "x", 5),
            entry("same-late", "2024-01-05", "Friday", "x", 9),
        ];
        let result = run_query(entries, &FilterSpec::default(), SortMode::Newest);
        assert_eq!(ids(&result.visible), vec!["same-late", "same-early", "old"]);
    }

    #[test]
    fn test_sort_oldest_is_reverse_of_newest() {
        let entries = vec![
            entry("a", "2024-03-01", "", "x", 3),
            entry("b", "2024-01-01", "", "x", 1),
            entry("c", "2024-02-01", "", "x", 7),
            entry("d", "2024-02-01", "", "x", 2),
        ];
        let mut newest = run_query(entries.clone(), &FilterSpec::default(), SortMode::Newest).visible;
        newest.reverse();
        let oldest = run_query(entries, &FilterSpec::default(), SortMode::Oldest).visible;
        assert_eq!(newest, oldest);
    }

    #[test]
    fn test_sort_updated_ignores_date() {
        let entries = vec![
            entry("a", "2024-03-01", "", "x", 3),
            entry("b", "2024-01-01", "", "x", 9),
        ];
        let result = run_query(entries, &FilterSpec::default(), SortMode::Updated);
        assert_eq!(ids(&result.visible), vec!["b", "a"]);
    }

    #[test]
    fn test_summary_when_nothing_filtered() {
        let result = run_query(sample(), &FilterSpec::default(), SortMode::Newest);
        assert_eq!(result.summary(), "2 entries");
    }

    #[test]
    fn test_sort_mode_from_str() {
        assert_eq!("Oldest".parse::<SortMode>().unwrap(), SortMode::Oldest);
        assert!("random".parse::<SortMode>().is_err());
    }

    #[test]
    fn test_highlight_marks_all_occurrences() {
        assert_eq!(
            highlight("Bug here, bug there", "bug", "[", "]"),
            "[Bug] here, [bug] there"
        );
    }

    #[test]
    fn test_highlight_escapes_regex_characters() {
        assert_eq!(highlight("cost (a+b)?", "(a+b)?", "<", ">"), "cost <(a+b)?>");
        assert_eq!(highlight("plain", "", "<", ">"), "plain");
    }
}
