use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "keyscout",
    about = "Infer keys and foreign-key relationships from CSV files",
    version,
    after_help = "Examples:\n  keyscout profile data/customers.csv data/orders.csv\n  keyscout detect data/ --output-dir outputs\n  keyscout detect data/*.csv --threshold 0.9 --format json\n  keyscout graph data/ --format dot > model.dot\n  keyscout graph --from-store outputs\n  keyscout edit --output-dir outputs --input reviewed.json\n  keyscout history --output-dir outputs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a keyscout.toml (default: ./keyscout.toml if present)
    #[arg(long, global = true, env = "KEYSCOUT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Profile every column of the input tables
    Profile(ProfileArgs),

    /// Detect foreign-key relationships between the input tables
    Detect(DetectArgs),

    /// Render relationships as a Mermaid or DOT graph
    Graph(GraphArgs),

    /// Show stored relationship versions
    History(HistoryArgs),

    /// Store a reviewed relationship list as the edited version
    Edit(EditArgs),
}

/// Input files shared by every command that reads data.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// CSV files, or directories whose CSV files are all loaded
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Recognize ISO-8601 dates and datetimes as their own type
    #[arg(long)]
    pub parse_dates: bool,
}

#[derive(Parser, Debug)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: ReportFormat,
}

#[derive(Parser, Debug)]
pub struct DetectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Directory to write initial_relationships.json into
    #[arg(long, env = "KEYSCOUT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: ReportFormat,
}

/// Detection knobs that override keyscout.toml.
#[derive(Args, Debug, Default)]
pub struct TuningArgs {
    /// Minimum overlap ratio (exclusive) for a relationship, in [0, 1)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Worker threads for profiling and comparison
    #[arg(long)]
    pub workers: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// CSV files or directories to detect relationships from
    #[arg(required_unless_present = "from_store", conflicts_with = "from_store")]
    pub files: Vec<PathBuf>,

    /// Render the stored (edited, else initial) relationships in this directory
    #[arg(long)]
    pub from_store: Option<PathBuf>,

    /// Recognize ISO-8601 dates and datetimes as their own type
    #[arg(long)]
    pub parse_dates: bool,

    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Output format for the relationship graph
    #[arg(long, default_value = "mermaid")]
    pub format: GraphFormat,
}

#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Directory holding relationship documents (default: outputs)
    #[arg(long, env = "KEYSCOUT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: ReportFormat,
}

#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Directory holding relationship documents (default: outputs)
    #[arg(long, env = "KEYSCOUT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// JSON file with an array of relationships
    #[arg(long)]
    pub input: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GraphFormat {
    Mermaid,
    Dot,
}

impl GraphArgs {
    pub fn input(&self) -> InputArgs {
        InputArgs {
            files: self.files.clone(),
            parse_dates: self.parse_dates,
        }
    }
}
