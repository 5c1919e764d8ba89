use clap::Parser;
use clashdash::cli::commands::Cli;
use clashdash::cli::{console, handlers};

fn main() {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone();

    match cli.command {
        None => {
            // No subcommand → interactive console
            if let Err(e) = console::run(data_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(cmd) => {
            if let Err(e) = handlers::dispatch(cmd, data_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
