//! List entries use case: view state and the query it drives

use crate::domain::dates::{parse_weekday_code, QuickRange};
use crate::domain::{run_query, Entry, FilterSpec, QueryResult, SortMode};
use crate::error::{Result, WorklogError};
use crate::infrastructure::{EntrySlot, EntryStore};
use chrono::NaiveDate;

/// Filter and sort currently applied to the list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub filter: FilterSpec,
    pub sort: SortMode,
}

/// A change to the list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    SetQuery(String),
    SetRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    ApplyQuickRange {
        range: QuickRange,
        today: NaiveDate,
    },
    /// Three-letter weekday code, e.g. "Mon"
    ToggleWeekday(String),
    SetSort(SortMode),
    /// Clear the query and date range
    ClearFilters,
}

impl ViewState {
    pub fn apply(mut self, command: ViewCommand) -> ViewState {
        match command {
            ViewCommand::SetQuery(query) => self.filter.query = query,
            ViewCommand::SetRange { from, to } => {
                self.filter.from = from;
                self.filter.to = to;
            }
            ViewCommand::ApplyQuickRange { range, today } => {
                let (from, to) = range.bounds(today);
                self.filter.from = from;
                self.filter.to = to;
            }
            ViewCommand::ToggleWeekday(code) => {
                if !self.filter.weekdays.remove(&code) {
                    self.filter.weekdays.insert(code);
                }
            }
            ViewCommand::SetSort(sort) => self.sort = sort,
            ViewCommand::ClearFilters => {
                self.filter.query.clear();
                self.filter.from = None;
                self.filter.to = None;
            }
        }
        self
    }

    /// Run the query over `entries`
    pub fn query(&self, entries: Vec<Entry>) -> QueryResult {
        run_query(entries, &self.filter, self.sort)
    }
}

/// Weekday toggle command from user input ("mon", "Monday", "fri")
pub fn toggle_weekday(input: &str) -> Result<ViewCommand> {
    parse_weekday_code(input)
        .map(|code| ViewCommand::ToggleWeekday(code.to_string()))
        .ok_or_else(|| {
            WorklogError::Validation(format!(
                "Invalid weekday: '{}'. Use mon, tue, wed, thu, fri, sat or sun",
                input
            ))
        })
}

/// Load the stored entries and apply the view
pub fn list_entries<S: EntrySlot>(store: &EntryStore<S>, view: &ViewState) -> QueryResult {
    view.query(store.load())
}
