use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::slot::DataSlot;
use crate::model::record::{Priority, Status, field};
use crate::ops::export::{self, EXPORT_COLUMNS};
use crate::ops::filter::FilterState;
use crate::ops::import::{ImportFormat, sample_records};
use crate::ops::session::Session;
use crate::ops::stats;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cmd: Commands, data_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = resolve_data_dir(data_dir)?;
    let mut session = open_session(&dir)?;

    match cmd {
        // Read commands
        Commands::List(args) => cmd_list(&session, args),
        Commands::Show(args) => cmd_show(&session, args),
        Commands::Stats(args) => cmd_stats(&session, args),
        Commands::Export(args) => cmd_export(&session, args),

        // Write commands
        Commands::Import(args) => cmd_import(&mut session, args),
        Commands::Sample => cmd_sample(&mut session),
        Commands::Status(args) => cmd_status(&mut session, args),
        Commands::Assign(args) => cmd_assign(&mut session, args),
        Commands::Edit(args) => cmd_edit(&mut session, args),
        Commands::Delete(args) => cmd_delete(&mut session, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn resolve_data_dir(flag: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match flag {
        Some(dir) => {
            let abs = fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
            Ok(abs)
        }
        None => Ok(std::env::current_dir()?),
    }
}

pub fn open_session(dir: &Path) -> Result<Session, Box<dyn std::error::Error>> {
    let config = config_io::read_config(dir)?;
    let slot = DataSlot::new(dir.join(&config.data_file));
    Ok(Session::open(slot, config.history_limit))
}

pub fn parse_status(s: &str) -> Result<Status, String> {
    Status::parse(s).ok_or_else(|| {
        format!(
            "invalid status '{}' (expected open, assigned, or resolved)",
            s
        )
    })
}

pub fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse(s)
        .ok_or_else(|| format!("invalid priority '{}' (expected high, medium, or low)", s))
}

/// Resolve a field name for `edit`, case-insensitively, against the known
/// column set. ClashID itself is not editable.
pub fn resolve_field(name: &str) -> Result<&'static str, String> {
    EXPORT_COLUMNS
        .iter()
        .find(|c| **c != field::CLASH_ID && c.eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| format!("unknown field '{}'", name))
}

/// Validate an edit value for the enum-like fields.
pub fn check_field_value(field_name: &str, value: &str) -> Result<(), String> {
    if field_name == field::STATUS {
        parse_status(value)?;
    } else if field_name == field::PRIORITY {
        parse_priority(value)?;
    }
    Ok(())
}

pub fn filter_from_list_args(args: &ListArgs) -> Result<FilterState, String> {
    if let Some(s) = &args.status {
        parse_status(s)?;
    }
    if let Some(p) = &args.priority {
        parse_priority(p)?;
    }
    Ok(FilterState {
        text: args.search.clone(),
        status: args.status.clone(),
        priority: args.priority.clone(),
        model: args.model.clone(),
        category: args.category.clone(),
        assignee: args.assignee.clone(),
    })
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(session: &Session, args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let filter = filter_from_list_args(&args)?;
    let matched = filter.apply(session.store());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matched)?);
        return Ok(());
    }

    for record in &matched {
        println!("{}", format_record_line(record));
    }
    if filter.is_empty() {
        println!("{} clashes", matched.len());
    } else {
        println!("{} of {} clashes", matched.len(), session.store().len());
    }
    Ok(())
}

fn cmd_show(session: &Session, args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let record = session
        .store()
        .find(&args.id)
        .ok_or_else(|| format!("no clash with ID '{}'", args.id))?;
    for line in format_record_detail(record) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_stats(session: &Session, args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let summary = stats::summarize(session.store());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for line in format_summary(&summary) {
        println!("{}", line);
    }
    let involvement = stats::model_involvement(session.store());
    if !involvement.is_empty() {
        println!();
        println!("Most involved models:");
        for line in format_involvement(&involvement) {
            println!("  {}", line);
        }
    }
    Ok(())
}

fn cmd_export(session: &Session, args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let records = session.store().records();
    let text = match args.format {
        ExportFormat::Json => export::to_json(records)?,
        ExportFormat::Csv => export::to_csv(records),
        ExportFormat::Report => {
            let summary = stats::summarize(session.store());
            export::report(records, &summary, Utc::now())
        }
    };

    match args.output {
        Some(path) => {
            fs::write(&path, &text)?;
            println!("Exported {} clashes to {}", records.len(), path);
        }
        None => print!("{}", ensure_trailing_newline(text)),
    }
    Ok(())
}

fn ensure_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_import(session: &mut Session, args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let count = import_file(session, &args.file)?;
    println!("Imported {} clashes from {}", count, args.file);
    Ok(())
}

/// Shared by the subcommand and the console.
pub fn import_file(session: &mut Session, path: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let format = ImportFormat::from_path(Path::new(path));
    let text = fs::read_to_string(path).map_err(|e| format!("cannot read '{}': {}", path, e))?;
    Ok(session.import(&text, format)?)
}

fn cmd_sample(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let count = session.load_records(sample_records())?;
    println!("Loaded {} sample clashes", count);
    Ok(())
}

fn cmd_status(session: &mut Session, args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let status = parse_status(&args.status)?;
    let count = session.set_status(&args.ids, status);
    report_bulk(count, &format!("set to {}", status.label()));
    Ok(())
}

fn cmd_assign(session: &mut Session, args: AssignArgs) -> Result<(), Box<dyn std::error::Error>> {
    let count = session.assign(&args.ids, &args.assignee);
    report_bulk(count, &format!("assigned to {}", args.assignee));
    Ok(())
}

fn cmd_edit(session: &mut Session, args: EditArgs) -> Result<(), Box<dyn std::error::Error>> {
    let field_name = resolve_field(&args.field)?;
    check_field_value(field_name, &args.value)?;
    let ids = [args.id.clone()];
    let count = session.edit_field(&ids, field_name, &args.value);
    if count == 0 {
        return Err(format!("no clash with ID '{}'", args.id).into());
    }
    println!("Updated {} on {}", field_name, args.id);
    Ok(())
}

fn cmd_delete(session: &mut Session, args: DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let count = session.delete(&args.ids);
    report_bulk(count, "deleted");
    Ok(())
}

fn report_bulk(count: usize, action: &str) {
    if count == 0 {
        println!("No matching clashes");
    } else if count == 1 {
        println!("1 clash {}", action);
    } else {
        println!("{} clashes {}", count, action);
    }
}
