//! worklog - Daily work journal for the terminal
//!
//! Records one dated note per piece of work, lists them with search, date and
//! weekday filters, and exports them as a text transcript, a JSON backup, a
//! legacy spreadsheet or a CSV file synced to cloud storage.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::WorklogError;
