use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod dataset;
mod error;
mod extract;
mod output;
mod prompt;
mod provider;
mod result;
mod runner;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before arg parsing so env-backed flags see the keys
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Progress (run/aggregate accuracies) is logged at info; --verbose adds debug
    let filter = if cli.verbose {
        EnvFilter::new("vpct=debug")
    } else {
        EnvFilter::new("vpct=info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::Schema => cli::schema::execute(),
    }
}
