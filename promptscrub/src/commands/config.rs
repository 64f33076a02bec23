// promptscrub/src/commands/config.rs
//! `promptscrub config`: shows the effective configuration and where it is
//! looked for.

use anyhow::{Context, Result};
use std::io::{self, Write};

use promptscrub_core::{config_candidate_paths, load_effective_config};

use crate::cli::ConfigCommand;

pub fn run_config(cmd: ConfigCommand) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    match cmd {
        ConfigCommand::Show { config } => {
            let mut effective = load_effective_config(config.as_deref())?;
            if effective.model.api_token.is_some() {
                effective.model.api_token = Some("********".to_string());
            }
            let yaml = serde_yml::to_string(&effective).context("Failed to serialize configuration")?;
            write!(writer, "{}", yaml)?;
        }
        ConfigCommand::Paths => {
            for path in config_candidate_paths() {
                let marker = if path.is_file() { "found" } else { "-" };
                writeln!(writer, "{}\t{}", marker, path.display())?;
            }
        }
    }
    Ok(())
}
