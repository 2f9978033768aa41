//! Journal entries and import normalization

use crate::domain::dates::{parse_iso_date, to_iso, weekday_name, weekday_name_for};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One journal record for a calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    /// Weekday name cached from `date_iso`
    pub day: String,
    pub notes: String,
    /// Milliseconds since the Unix epoch
    #[serde(rename = "lastUpdated")]
    pub last_updated: i64,
}

impl Entry {
    /// Build an entry for `date`, deriving the weekday name
    pub fn new(id: String, date: NaiveDate, notes: String, now: i64) -> Self {
        Entry {
            id,
            date_iso: to_iso(date),
            day: weekday_name(date),
            notes,
            last_updated: now,
        }
    }

    /// Parsed date, `None` if the stored string is not `YYYY-MM-DD`
    pub fn date(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.date_iso)
    }

    /// First line of the notes, for one-line listings
    pub fn headline(&self) -> &str {
        self.notes.lines().next().unwrap_or("")
    }
}

/// Id for an entry created through the entry form
pub fn new_entry_id(now: i64) -> String {
    format!("e_{}", now)
}

/// Id for an imported record that arrived without one
pub fn new_import_id(now: i64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("e_{}_{}", now, &suffix[..10])
}

/// An import record before validation
///
/// Fields hold whatever JSON value the file contained; `normalize` coerces
/// them into a well-formed [`Entry`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub id: Value,
    pub date_iso: Value,
    pub day: Value,
    pub notes: Value,
    pub last_updated: Value,
}

impl From<Value> for RawEntry {
    fn from(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return RawEntry::default();
        };
        let mut take = |key: &str| map.remove(key).unwrap_or(Value::Null);

        RawEntry {
            id: take("id"),
            date_iso: take("dateISO"),
            day: take("day"),
            notes: take("notes"),
            last_updated: take("lastUpdated"),
        }
    }
}

impl RawEntry {
    /// Coerce into an entry, or `None` when the date or notes are missing.
    ///
    /// Missing id, day and timestamp are filled in; the date is cut to its
    /// first ten characters and must then be a valid `YYYY-MM-DD`.
    pub fn normalize(&self, now: i64) -> Option<Entry> {
        let date_iso: String = coerce_text(&self.date_iso)
            .unwrap_or_default()
            .chars()
            .take(10)
            .collect();
        let notes = coerce_text(&self.notes).unwrap_or_default();

        if date_iso.is_empty() || notes.is_empty() {
            return None;
        }
        parse_iso_date(&date_iso)?;

        let id = coerce_text(&self.id).unwrap_or_else(|| new_import_id(now));
        let day = coerce_text(&self.day).unwrap_or_else(|| weekday_name_for(&date_iso));
        let last_updated = coerce_millis(&self.last_updated).unwrap_or(now);

        Some(Entry {
            id,
            date_iso,
            day,
            notes,
            last_updated,
        })
    }
}

/// Text form of a loose value; empty, null, false and zero count as missing
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn coerce_millis(value: &Value) -> Option<i64> {
    let millis = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i64))
        }
        _ => None,
    }?;
    (millis != 0).then_some(millis)
}
