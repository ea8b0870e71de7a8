pub mod inbox;
pub mod plan;
pub mod report;
pub mod respond;
pub mod schema;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "salo360")]
#[command(
    author,
    version,
    about = "Plan and collect 180/360 employee evaluations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan an evaluation cycle and store the assignments
    Plan(PlanArgs),

    /// Record the scores for one assignment
    Respond(RespondArgs),

    /// Show what an employee owes, received, and oversees
    Inbox(InboxArgs),

    /// Summarize the completed evaluations of one employee
    Report(ReportArgs),

    /// Print JSON Schema for config validation
    Schema(SchemaArgs),
}

#[derive(Parser, Clone)]
pub struct PlanArgs {
    /// Path to config file
    #[arg(short, long, default_value = "salo360.yaml", env = "SALO360_CONFIG")]
    pub config: PathBuf,

    /// Evaluation type: 180 or 360
    #[arg(long = "type", value_name = "TYPE")]
    pub evaluation_type: Option<String>,

    /// Role whose holders are evaluated
    #[arg(long)]
    pub role: Option<String>,

    /// Period label (defaults to the current quarter, e.g. "Q3 2025")
    #[arg(long)]
    pub period: Option<String>,

    /// Comments prefilled on every assignment
    #[arg(long)]
    pub comments: Option<String>,

    /// Request file (YAML or JSON); flags given on the command line win
    #[arg(long)]
    pub request: Option<PathBuf>,

    /// Override the roster file
    #[arg(long)]
    pub roster: Option<PathBuf>,

    /// Override output directory
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Generate sequential ids with this prefix instead of UUIDs
    #[arg(long)]
    pub id_prefix: Option<String>,

    /// Show the plan without storing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Clone)]
pub struct RespondArgs {
    /// Path to config file
    #[arg(short, long, default_value = "salo360.yaml", env = "SALO360_CONFIG")]
    pub config: PathBuf,

    /// Assignment to complete
    #[arg(long)]
    pub id: String,

    /// Competency score, repeatable (e.g. --score communication=4)
    #[arg(long = "score", value_name = "COMPETENCY=SCORE")]
    pub scores: Vec<String>,

    #[arg(long, default_value = "")]
    pub comments: String,
}

#[derive(Parser, Clone)]
pub struct InboxArgs {
    /// Path to config file
    #[arg(short, long, default_value = "salo360.yaml", env = "SALO360_CONFIG")]
    pub config: PathBuf,

    /// Employee whose inbox is shown
    #[arg(long)]
    pub viewer: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Clone)]
pub struct ReportArgs {
    /// Path to config file
    #[arg(short, long, default_value = "salo360.yaml", env = "SALO360_CONFIG")]
    pub config: PathBuf,

    /// Employee to summarize
    #[arg(long)]
    pub employee: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Clone)]
pub struct SchemaArgs {
    /// Write the schema to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}
