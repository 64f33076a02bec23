// promptscrub/src/main.rs
//! promptscrub entry point.
//!
//! Loads `.env`, parses the command line, initializes logging and dispatches
//! to the selected command.

use anyhow::Result;
use clap::Parser;
use log::debug;

use promptscrub::cli::{Cli, Commands};
use promptscrub::commands::{check_model, config, error_msg, redact, scan};
use promptscrub::logger;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error_msg(format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let args = Cli::parse();

    logger::init_logger(logger::level_for_flags(args.quiet, args.debug));
    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    match args.command {
        Commands::Redact(cmd) => redact::run_redact(cmd, args.quiet).await,
        Commands::Scan(cmd) => scan::run_scan(cmd, args.quiet).await,
        Commands::CheckModel(cmd) => check_model::run_check_model(cmd, args.quiet).await,
        Commands::Config(cmd) => config::run_config(cmd),
    }
}
