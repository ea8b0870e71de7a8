use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod error;
mod inbox;
mod output;
mod planner;
mod report;
mod response;
mod roster;
mod store;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("salo360=debug")
    } else {
        EnvFilter::new("salo360=warn")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Plan(args) => cli::plan::execute(args).await,
        Commands::Respond(args) => cli::respond::execute(args).await,
        Commands::Inbox(args) => cli::inbox::execute(args).await,
        Commands::Report(args) => cli::report::execute(args).await,
        Commands::Schema(args) => cli::schema::execute(args),
    }
}
