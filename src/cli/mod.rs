//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{Cli, CloudCommand, Commands, ExportFormat, SheetCommand};
pub use output::{format_entry_list, format_entry_view, Highlight};
