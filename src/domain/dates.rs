//! Civil-date helpers: weekday names, date input parsing and quick ranges
//!
//! Every date here is a local calendar date without a time zone. Entry dates
//! are stored as fixed-width `YYYY-MM-DD` strings so that plain string
//! comparison orders them chronologically.

use crate::error::{Result, WorklogError};
use chrono::{Datelike, Duration, Months, NaiveDate, TimeZone, Weekday};
use std::str::FromStr;

/// Storage format for entry dates
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` date.
///
/// chrono tolerates padding blanks and signs, so the input must also be the
/// canonical rendering of the parsed date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
        .ok()
        .filter(|date| to_iso(*date) == value)
}

/// Format a date in the storage format
pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Full English weekday name for a date (e.g. "Thursday")
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Weekday name for a stored date string, empty when it does not parse
pub fn weekday_name_for(date_iso: &str) -> String {
    parse_iso_date(date_iso)
        .map(weekday_name)
        .unwrap_or_default()
}

/// Human display form used in titles (e.g. "Wed, Jan 03, 2024")
pub fn display_date(date_iso: &str) -> String {
    match parse_iso_date(date_iso) {
        Some(date) => date.format("%a, %b %d, %Y").to_string(),
        None => date_iso.to_string(),
    }
}

/// Render a millisecond timestamp in the given zone
pub fn format_timestamp<Tz: TimeZone>(millis: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match tz.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// Three-letter weekday code as used by weekday filters (e.g. "Mon")
pub fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Normalize a weekday given as name or code (`monday`, `Mon`) to its code
pub fn parse_weekday_code(input: &str) -> Option<&'static str> {
    weekday_from_name(&input.trim().to_lowercase()).map(weekday_code)
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// A date as typed on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Today,
    Yesterday,
    Tomorrow,
    /// Today if it matches, otherwise the most recent occurrence
    Weekday(Weekday),
    /// Strictly before today
    LastWeekday(Weekday),
    /// Strictly after today
    NextWeekday(Weekday),
    Exact(NaiveDate),
}

impl DateInput {
    /// Parse a date reference (`today`, `last monday`, `2024-01-03`, ...)
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();
        let invalid = || WorklogError::InvalidDate(input.to_string());

        match normalized.as_str() {
            "today" | "now" => return Ok(DateInput::Today),
            "yesterday" => return Ok(DateInput::Yesterday),
            "tomorrow" => return Ok(DateInput::Tomorrow),
            _ => {}
        }

        if let Some(rest) = normalized.strip_prefix("last ") {
            return weekday_from_name(rest.trim())
                .map(DateInput::LastWeekday)
                .ok_or_else(invalid);
        }
        if let Some(rest) = normalized.strip_prefix("next ") {
            return weekday_from_name(rest.trim())
                .map(DateInput::NextWeekday)
                .ok_or_else(invalid);
        }
        if let Some(weekday) = weekday_from_name(&normalized) {
            return Ok(DateInput::Weekday(weekday));
        }

        parse_iso_date(&normalized)
            .map(DateInput::Exact)
            .ok_or_else(invalid)
    }

    /// Resolve against a base date (usually today)
    pub fn resolve(&self, base: NaiveDate) -> NaiveDate {
        let days_back = |target: Weekday| {
            (base.weekday().num_days_from_monday() + 7 - target.num_days_from_monday()) % 7
        };

        match self {
            DateInput::Today => base,
            DateInput::Yesterday => base - Duration::days(1),
            DateInput::Tomorrow => base + Duration::days(1),
            DateInput::Weekday(target) => base - Duration::days(days_back(*target) as i64),
            DateInput::LastWeekday(target) => {
                let back = match days_back(*target) {
                    0 => 7,
                    n => n,
                };
                base - Duration::days(back as i64)
            }
            DateInput::NextWeekday(target) => {
                let forward = match (7 - days_back(*target)) % 7 {
                    0 => 7,
                    n => n,
                };
                base + Duration::days(forward as i64)
            }
            DateInput::Exact(date) => *date,
        }
    }
}

/// Resolve a command-line date against today's local date
pub fn resolve_date_input(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    Ok(DateInput::parse(input)?.resolve(today))
}

/// Today's local civil date
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Preset date ranges offered next to the from/to inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickRange {
    Today,
    /// Today and the six days before it
    LastSevenDays,
    ThisMonth,
    LastMonth,
    /// Clears both bounds
    All,
}

impl QuickRange {
    /// Inclusive bounds of this range relative to `today`
    pub fn bounds(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match self {
            QuickRange::Today => (Some(today), Some(today)),
            QuickRange::LastSevenDays => (Some(today - Duration::days(6)), Some(today)),
            QuickRange::ThisMonth => {
                let (start, end) = month_bounds(today);
                (Some(start), Some(end))
            }
            QuickRange::LastMonth => {
                let (this_start, _) = month_bounds(today);
                let (start, end) = month_bounds(this_start - Duration::days(1));
                (Some(start), Some(end))
            }
            QuickRange::All => (None, None),
        }
    }
}

fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day(1).unwrap_or(date);
    let end = start
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .unwrap_or(date);
    (start, end)
}

impl FromStr for QuickRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" => Ok(QuickRange::Today),
            "7d" | "week" | "last-7-days" => Ok(QuickRange::LastSevenDays),
            "this-month" | "month" => Ok(QuickRange::ThisMonth),
            "last-month" => Ok(QuickRange::LastMonth),
            "all" => Ok(QuickRange::All),
            _ => Err(format!(
                "Invalid range: '{}'. Valid ranges are: today, 7d, this-month, last-month, all",
                s
            )),
        }
    }
}
