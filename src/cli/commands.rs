use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "clashdash",
    about = concat!("clashdash v", env!("CARGO_PKG_VERSION"), " - clash detection dashboard"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import clashes from a CSV or JSON file (replaces current data)
    Import(ImportArgs),
    /// Load the built-in sample data set
    Sample,
    /// List clashes, optionally filtered
    List(ListArgs),
    /// Show one clash in full
    Show(ShowArgs),
    /// Show aggregate statistics
    Stats(StatsArgs),
    /// Set the status on one or more clashes
    Status(StatusArgs),
    /// Assign one or more clashes to a person
    Assign(AssignArgs),
    /// Set a single field on a clash
    Edit(EditArgs),
    /// Delete one or more clashes
    Delete(DeleteArgs),
    /// Export the current data set
    Export(ExportArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (open, assigned, resolved)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by priority (high, medium, low)
    #[arg(long)]
    pub priority: Option<String>,
    /// Filter by model name (matches either side of the clash)
    #[arg(long)]
    pub model: Option<String>,
    /// Filter by category
    #[arg(long)]
    pub category: Option<String>,
    /// Filter by assignee
    #[arg(long)]
    pub assignee: Option<String>,
    /// Free-text search over ID, models, and notes
    #[arg(long)]
    pub search: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Clash ID
    pub id: String,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ImportArgs {
    /// Path to a .csv or .json file
    pub file: String,
}

#[derive(Args)]
pub struct StatusArgs {
    /// New status (open, assigned, resolved)
    pub status: String,
    /// Clash IDs to update
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct AssignArgs {
    /// Assignee name
    pub assignee: String,
    /// Clash IDs to assign
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Clash ID
    pub id: String,
    /// Field name (e.g. Notes, Location, Priority)
    pub field: String,
    /// New value
    pub value: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Clash IDs to delete
    #[arg(required = true)]
    pub ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Export args
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
    Report,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output format
    #[arg(value_enum)]
    pub format: ExportFormat,
    /// Write to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}
