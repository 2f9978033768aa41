//! CLI command definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "worklog")]
#[command(about = "Daily work journal for the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new journal
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },

    /// Record what you worked on
    Add {
        /// Date of the work (e.g., today, yesterday, last friday, 2024-01-03)
        #[arg(value_name = "DATE")]
        date: Option<String>,

        /// Notes text; opens the editor when omitted
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Change an existing entry
    Edit {
        /// Entry id (see `worklog list`)
        id: String,

        /// New date
        #[arg(short, long)]
        date: Option<String>,

        /// New notes text
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete an entry
    Delete {
        /// Entry id (see `worklog list`)
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List entries with search, filters and sorting
    List {
        /// Text to search for in notes, date and weekday
        #[arg(short, long)]
        query: Option<String>,

        /// Start date (inclusive)
        #[arg(long)]
        from: Option<String>,

        /// End date (inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Quick range (today, 7d, this-month, last-month, all)
        #[arg(short, long)]
        range: Option<String>,

        /// Only these weekdays (repeatable: --day mon --day fri)
        #[arg(long = "day", value_name = "WEEKDAY")]
        days: Vec<String>,

        /// Sort order (newest, oldest, updated)
        #[arg(short, long, default_value = "newest")]
        sort: String,

        /// Maximum number of entries to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show one entry in full
    View {
        /// Entry id (see `worklog list`)
        id: String,
    },

    /// Export all entries to a file
    Export {
        #[arg(value_enum)]
        format: ExportFormat,

        /// Output file (default: dated file in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace all entries with the contents of a JSON export
    Import {
        /// JSON file exported by worklog
        file: PathBuf,
    },

    /// Save entries to a spreadsheet file
    Sheet {
        #[command(subcommand)]
        action: SheetCommand,
    },

    /// Sync entries to a CSV file in cloud storage
    Cloud {
        #[command(subcommand)]
        action: CloudCommand,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Plain-text transcript
    Text,
    /// JSON, re-importable
    Json,
}

#[derive(Subcommand, Debug)]
pub enum SheetCommand {
    /// Choose the spreadsheet file, remember it and write to it
    Pick {
        /// Spreadsheet file to write
        path: PathBuf,
    },

    /// Write the spreadsheet now
    Save {
        /// Write a dated copy into this directory instead
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Show the remembered spreadsheet
    Status,

    /// Forget the remembered spreadsheet
    Forget,
}

#[derive(Subcommand, Debug)]
pub enum CloudCommand {
    /// Sign in to the cloud account
    Signin {
        /// Account name, e.g. you@example.com
        #[arg(long)]
        account: String,
    },

    /// Sign out and drop the cached token
    Signout,

    /// Show the signed-in account
    Status,

    /// Upload all entries as CSV
    Sync,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_collects_repeated_days() {
        let cli = Cli::parse_from([
            "worklog", "list", "--day", "mon", "--day", "fri", "-q", "bug",
        ]);
        match cli.command {
            Some(Commands::List { days, query, .. }) => {
                assert_eq!(days, vec!["mon", "fri"]);
                assert_eq!(query.as_deref(), Some("bug"));
            }
            other => panic!("Expected list command, got {:?}", other),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["worklog", "list", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }
}
