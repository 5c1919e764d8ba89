use std::io::{self, BufRead, Write};

use chrono::Utc;

use crate::cli::handlers::{
    self, check_field_value, import_file, parse_priority, parse_status, resolve_field,
};
use crate::cli::output::*;
use crate::ops::export;
use crate::ops::filter::FilterState;
use crate::ops::history::BoundaryError;
use crate::ops::import::sample_records;
use crate::ops::session::Session;
use crate::ops::stats;

const HELP: &str = "\
Commands:
  import <file>              replace data from a .csv or .json file
  sample                     load the built-in sample data
  list                       list clashes (respects active filters)
  filter <key> <value>       set a filter (status, priority, model, category, assignee)
  search <text>              set the free-text filter
  clear                      clear all filters
  show <id>                  show one clash in full
  stats                      aggregate statistics
  status <status> <ids...>   set status on one or more clashes
  assign <name> <ids...>     assign one or more clashes
  edit <id> <field> <value>  set one field on a clash
  delete <ids...>            delete one or more clashes
  undo / redo                step through edit history
  export <json|csv|report> [file]
  help                       this text
  quit                       exit";

/// Interactive console. One session lives for the whole loop, so undo and
/// redo operate on the edits made here.
pub fn run(data_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = handlers::resolve_data_dir(data_dir)?;
    let mut session = handlers::open_session(&dir)?;
    let mut filter = FilterState::default();

    println!(
        "clashdash v{} - {} clashes loaded (type 'help' for commands)",
        env!("CARGO_PKG_VERSION"),
        session.store().len()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("clash> ");
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if matches!(tokens[0], "quit" | "exit" | "q") {
            break;
        }
        if let Err(e) = eval(&mut session, &mut filter, &tokens) {
            eprintln!("error: {}", e);
        }
    }
    Ok(())
}

fn eval(
    session: &mut Session,
    filter: &mut FilterState,
    tokens: &[&str],
) -> Result<(), Box<dyn std::error::Error>> {
    match tokens[0] {
        "help" => println!("{}", HELP),

        "import" => {
            let file = arg(tokens, 1, "import <file>")?;
            let count = import_file(session, file)?;
            println!("Imported {} clashes", count);
        }
        "sample" => {
            let count = session.load_records(sample_records())?;
            println!("Loaded {} sample clashes", count);
        }

        "list" => {
            let matched = filter.apply(session.store());
            for record in &matched {
                println!("{}", format_record_line(record));
            }
            if filter.is_empty() {
                println!("{} clashes", matched.len());
            } else {
                println!("{} of {} clashes", matched.len(), session.store().len());
            }
        }
        "filter" => {
            let key = arg(tokens, 1, "filter <key> <value>")?;
            arg(tokens, 2, "filter <key> <value>")?;
            let value = tokens[2..].join(" ");
            match key {
                "status" => {
                    parse_status(&value)?;
                    filter.status = Some(value);
                }
                "priority" => {
                    parse_priority(&value)?;
                    filter.priority = Some(value);
                }
                "model" => filter.model = Some(value),
                "category" => filter.category = Some(value),
                "assignee" => filter.assignee = Some(value),
                _ => return Err(format!("unknown filter key '{}'", key).into()),
            }
            println!("Filter set");
        }
        "search" => {
            arg(tokens, 1, "search <text>")?;
            filter.text = Some(tokens[1..].join(" "));
            println!("Search set");
        }
        "clear" => {
            *filter = FilterState::default();
            println!("Filters cleared");
        }

        "show" => {
            let id = arg(tokens, 1, "show <id>")?;
            let record = session
                .store()
                .find(id)
                .ok_or_else(|| format!("no clash with ID '{}'", id))?;
            for line in format_record_detail(record) {
                println!("{}", line);
            }
        }
        "stats" => {
            let summary = stats::summarize(session.store());
            for line in format_summary(&summary) {
                println!("{}", line);
            }
        }

        "status" => {
            let status = parse_status(arg(tokens, 1, "status <status> <ids...>")?)?;
            let ids = id_args(tokens, 2, "status <status> <ids...>")?;
            report_count(session.set_status(&ids, status));
        }
        "assign" => {
            let assignee = arg(tokens, 1, "assign <name> <ids...>")?.to_string();
            let ids = id_args(tokens, 2, "assign <name> <ids...>")?;
            report_count(session.assign(&ids, &assignee));
        }
        "edit" => {
            let id = arg(tokens, 1, "edit <id> <field> <value>")?.to_string();
            let field_name = resolve_field(arg(tokens, 2, "edit <id> <field> <value>")?)?;
            arg(tokens, 3, "edit <id> <field> <value>")?;
            let value = tokens[3..].join(" ");
            check_field_value(field_name, &value)?;
            report_count(session.edit_field(&[id], field_name, &value));
        }
        "delete" => {
            let ids = id_args(tokens, 1, "delete <ids...>")?;
            report_count(session.delete(&ids));
        }

        "undo" => match session.undo() {
            Ok(()) => println!("Undone"),
            Err(BoundaryError::NothingToUndo) => println!("Nothing to undo"),
            Err(e) => return Err(e.into()),
        },
        "redo" => match session.redo() {
            Ok(()) => println!("Redone"),
            Err(BoundaryError::NothingToRedo) => println!("Nothing to redo"),
            Err(e) => return Err(e.into()),
        },

        "export" => {
            let records = session.store().records();
            let text = match arg(tokens, 1, "export <json|csv|report> [file]")? {
                "json" => export::to_json(records)?,
                "csv" => export::to_csv(records),
                "report" => {
                    let summary = stats::summarize(session.store());
                    export::report(records, &summary, Utc::now())
                }
                other => return Err(format!("unknown export format '{}'", other).into()),
            };
            match tokens.get(2) {
                Some(path) => {
                    std::fs::write(path, &text)?;
                    println!("Exported {} clashes to {}", records.len(), path);
                }
                None => {
                    print!("{}", text);
                    if !text.ends_with('\n') {
                        println!();
                    }
                }
            }
        }

        other => return Err(format!("unknown command '{}' (try 'help')", other).into()),
    }
    Ok(())
}

fn arg<'a>(tokens: &[&'a str], index: usize, usage: &str) -> Result<&'a str, String> {
    tokens
        .get(index)
        .copied()
        .ok_or_else(|| format!("usage: {}", usage))
}

fn id_args(tokens: &[&str], from: usize, usage: &str) -> Result<Vec<String>, String> {
    if tokens.len() <= from {
        return Err(format!("usage: {}", usage));
    }
    Ok(tokens[from..].iter().map(|s| s.to_string()).collect())
}

fn report_count(count: usize) {
    if count == 0 {
        println!("No matching clashes");
    } else if count == 1 {
        println!("1 clash updated");
    } else {
        println!("{} clashes updated", count);
    }
}
