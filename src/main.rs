use chrono::{Local, Utc};
use clap::Parser;
use dialoguer::Confirm;
use std::io::IsTerminal;
use std::str::FromStr;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use worklog::application::entry_form::NOTES_SCRATCH;
use worklog::application::import_export::{export_json, export_text, import_json};
use worklog::application::init::init;
use worklog::application::list_entries::toggle_weekday;
use worklog::application::manage_config::{ConfigService, CONFIG_KEYS};
use worklog::application::{
    delete_entry, find_entry, list_entries, CloudSyncService, DeleteOutcome, EntryFormService,
    SaveTarget, Session, SpreadsheetService, ViewCommand, ViewState, Workspace,
};
use worklog::cli::{
    format_entry_list, format_entry_view, Cli, CloudCommand, Commands, ExportFormat, Highlight,
    SheetCommand,
};
use worklog::domain::dates::{local_today, resolve_date_input, to_iso};
use worklog::domain::{QuickRange, SortMode};
use worklog::error::WorklogError;
use worklog::infrastructure::{
    CachedTokenProvider, DriveClient, EditorSession, FileSystemRepository, SessionSlot,
    SpreadsheetXml,
};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

/// Log filter from WORKLOG_LOG, then RUST_LOG, else this crate at a level
/// picked by -v
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("WORKLOG_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn spreadsheet_service(workspace: &Workspace) -> SpreadsheetService<SpreadsheetXml> {
    SpreadsheetService::new(
        workspace.repository.clone(),
        workspace.config.spreadsheet.clone(),
        SpreadsheetXml,
    )
}

fn cloud_service(repository: &FileSystemRepository) -> CloudSyncService<CachedTokenProvider> {
    CloudSyncService::new(
        SessionSlot::new(repository.clone()),
        CachedTokenProvider::new(SessionSlot::new(repository.clone())),
    )
}

/// Rewrite the remembered spreadsheet after an entry changed. Failures are
/// reported and never fail the command.
fn autosave(workspace: &Workspace, session: &Session) {
    match spreadsheet_service(workspace).autosave(&workspace.store.load(), session) {
        Some(Ok(path)) => println!("Saved to spreadsheet: {}", path.display()),
        Some(Err(e)) => eprintln!("Autosave failed: {}", e.display_with_suggestions()),
        None => {}
    }
}

fn run(cli: Cli) -> Result<(), WorklogError> {
    match cli.command {
        Some(Commands::Init { path }) => init(&path),
        Some(Commands::Config { key, value, list }) => {
            let repo = FileSystemRepository::discover()?;
            let service = ConfigService::new(repo);

            if list {
                for (key, value) in service.entries()? {
                    println!("{} = {}", key, value);
                }
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
            } else {
                println!("Usage: worklog config [--list | <key> [<value>]]");
                println!("Valid keys: {}", CONFIG_KEYS.join(", "));
            }
            Ok(())
        }
        Some(Commands::Add { date, notes }) => {
            let workspace = Workspace::discover()?;
            let session = Session::restore(&workspace.repository, &workspace.config);
            let scratch = workspace.repository.slot_path(NOTES_SCRATCH);
            let service = EntryFormService::new(
                &workspace.store,
                EditorSession::new(workspace.config.get_editor()),
                &scratch,
            );

            let entry = service.add(date.as_deref(), notes, now_millis())?;
            println!(
                "Saved entry {} for {} ({})",
                entry.id, entry.date_iso, entry.day
            );
            autosave(&workspace, &session);
            Ok(())
        }
        Some(Commands::Edit { id, date, notes }) => {
            let workspace = Workspace::discover()?;
            let session = Session::restore(&workspace.repository, &workspace.config);
            let scratch = workspace.repository.slot_path(NOTES_SCRATCH);
            let service = EntryFormService::new(
                &workspace.store,
                EditorSession::new(workspace.config.get_editor()),
                &scratch,
            );

            let entry = service.edit(&id, date.as_deref(), notes, now_millis())?;
            println!(
                "Updated entry {} for {} ({})",
                entry.id, entry.date_iso, entry.day
            );
            autosave(&workspace, &session);
            Ok(())
        }
        Some(Commands::Delete { id, yes }) => {
            let workspace = Workspace::discover()?;
            let outcome = delete_entry(&workspace.store, &id, |entry| {
                if yes {
                    return Ok(true);
                }
                if !std::io::stdin().is_terminal() {
                    eprintln!("Refusing to delete without a terminal; pass --yes to confirm.");
                    return Ok(false);
                }
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Delete the entry for {} ({})?",
                        entry.date_iso, entry.day
                    ))
                    .default(false)
                    .interact()
                    .unwrap_or_else(|e| {
                        debug!("Confirmation aborted: {}", e);
                        false
                    });
                Ok(confirmed)
            })?;

            match outcome {
                DeleteOutcome::Deleted(entry) => println!("Deleted entry {}", entry.id),
                DeleteOutcome::Declined => println!("Entry kept."),
            }
            Ok(())
        }
        Some(Commands::List {
            query,
            from,
            to,
            range,
            days,
            sort,
            limit,
        }) => {
            let workspace = Workspace::discover()?;
            let today = local_today();

            let sort = SortMode::from_str(&sort).map_err(WorklogError::Validation)?;
            let mut view = ViewState::default().apply(ViewCommand::SetSort(sort));

            if let Some(range) = range {
                let range = QuickRange::from_str(&range).map_err(WorklogError::Validation)?;
                view = view.apply(ViewCommand::ApplyQuickRange { range, today });
            }
            if from.is_some() || to.is_some() {
                let from = from.map(|s| resolve_date_input(&s, today)).transpose()?;
                let to = to.map(|s| resolve_date_input(&s, today)).transpose()?;
                let command = ViewCommand::SetRange {
                    from: from.or(view.filter.from),
                    to: to.or(view.filter.to),
                };
                view = view.apply(command);
            }

            let mut toggles = Vec::new();
            for day in &days {
                let toggle = toggle_weekday(day)?;
                if !toggles.contains(&toggle) {
                    toggles.push(toggle);
                }
            }
            for toggle in toggles {
                view = view.apply(toggle);
            }

            if let Some(query) = query {
                view = view.apply(ViewCommand::SetQuery(query));
            }

            let result = list_entries(&workspace.store, &view);
            let style = if std::io::stdout().is_terminal() {
                Highlight::Ansi
            } else {
                Highlight::Plain
            };
            print!(
                "{}",
                format_entry_list(&result, view.filter.trimmed_query(), limit, style)
            );
            Ok(())
        }
        Some(Commands::View { id }) => {
            let workspace = Workspace::discover()?;
            let entry = find_entry(&workspace.store, &id)?;
            print!("{}", format_entry_view(&entry, &Local));
            Ok(())
        }
        Some(Commands::Export { format, output }) => {
            let workspace = Workspace::discover()?;
            let report = match format {
                ExportFormat::Text => {
                    export_text(&workspace.store, &Local::now(), output.as_deref())?
                }
                ExportFormat::Json => export_json(
                    &workspace.store,
                    &to_iso(local_today()),
                    output.as_deref(),
                )?,
            };
            println!(
                "Exported {} entries to {}",
                report.count,
                report.path.display()
            );
            Ok(())
        }
        Some(Commands::Import { file }) => {
            let workspace = Workspace::discover()?;
            let report = import_json(&workspace.store, &file, now_millis())?;
            println!("Import successful.");
            println!("{} of {} records imported.", report.kept, report.received);
            Ok(())
        }
        Some(Commands::Sheet { action }) => {
            let workspace = Workspace::discover()?;
            let service = spreadsheet_service(&workspace);

            match action {
                SheetCommand::Pick { path } => {
                    let handle = service.pick(&path, &workspace.store.load())?;
                    println!("Saved to spreadsheet: {}", handle.path.display());
                }
                SheetCommand::Save { output_dir } => {
                    let target = service.save(
                        &workspace.store.load(),
                        output_dir.as_deref(),
                        &to_iso(local_today()),
                    )?;
                    match target {
                        SaveTarget::Handle(path) => {
                            println!("Saved to spreadsheet: {}", path.display())
                        }
                        SaveTarget::Download(path) => {
                            println!("Saved a copy to {}", path.display())
                        }
                    }
                }
                SheetCommand::Status => {
                    let status = service.status();
                    match status.handle {
                        Some(handle) if status.writable => {
                            println!("Spreadsheet: {}", handle.path.display())
                        }
                        Some(handle) => println!(
                            "Spreadsheet: {} (not writable)",
                            handle.path.display()
                        ),
                        None => println!("No spreadsheet selected."),
                    }
                    if !status.persistent_handles {
                        println!("Remembered files are disabled; saves write dated copies.");
                    }
                }
                SheetCommand::Forget => {
                    service.forget()?;
                    println!("Forgot the remembered spreadsheet.");
                }
            }
            Ok(())
        }
        Some(Commands::Cloud { action }) => {
            let workspace = Workspace::discover()?;
            let service = cloud_service(&workspace.repository);

            match action {
                CloudCommand::Signin { account } => {
                    let account = service.sign_in(&account)?;
                    println!("Signed in as {}", account.username);
                }
                CloudCommand::Signout => {
                    service.sign_out()?;
                    println!("Signed out.");
                }
                CloudCommand::Status => match service.status() {
                    Some(account) => println!("Signed in as {}", account.username),
                    None => println!("Not signed in."),
                },
                CloudCommand::Sync => {
                    let session = Session::restore(&workspace.repository, &workspace.config);
                    let client = DriveClient::new(&workspace.config.cloud.base_url)?;
                    let report = service.sync(
                        &client,
                        &workspace.config.cloud.file_name,
                        &workspace.store.load(),
                        &session,
                    )?;
                    println!("{}", report.status_line());
                }
            }
            Ok(())
        }
        None => {
            println!("worklog - Daily work journal for the terminal");
            println!("Use --help for usage information");
            Ok(())
        }
    }
}
