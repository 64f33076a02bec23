// promptscrub/src/commands/redact.rs
//! `promptscrub redact`: the full pipeline from input to scrubbed prompt.

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::io::{self, Write};

use promptscrub_core::{ModelState, Scrubber};

use super::{info_msg, read_input, resolve_config, warn_msg};
use crate::cli::RedactCommand;

pub async fn run_redact(cmd: RedactCommand, quiet: bool) -> Result<()> {
    let mut config = resolve_config(cmd.config.as_deref(), &cmd.model)?;
    for (category, text) in &cmd.placeholders {
        config.placeholders.insert(category, text.clone());
    }
    if let Some(min_confidence) = cmd.min_confidence {
        config.min_confidence = min_confidence;
    }
    if cmd.normalize {
        config.normalize_input = true;
    }

    let input = read_input(cmd.input_file.as_deref())?;
    let scrubber = Scrubber::new(config).context("Failed to set up the redaction pipeline")?;

    info!("Starting redaction.");
    let report = scrubber.redact_with_report(&input).await;
    info!("Redaction completed.");

    write_output(cmd.output.as_deref(), &report.redacted)?;

    if !quiet {
        match scrubber.model_handle().map(|h| h.state()) {
            Some(ModelState::Failed(reason)) => {
                warn_msg(format!("Model unavailable, used pattern detection only: {}", reason));
            }
            Some(ModelState::Loading) => {
                warn_msg("Model did not finish loading in time, used pattern detection only.");
            }
            _ => {}
        }
        if !cmd.no_summary {
            info_msg(format!("Detected {} entit(ies).", report.entities.len()));
        }
    }
    Ok(())
}

fn write_output(path: Option<&std::path::Path>, redacted: &str) -> Result<()> {
    let newline = if redacted.ends_with('\n') { "" } else { "\n" };
    match path {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write!(file, "{}{}", redacted, newline)?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write!(writer, "{}{}", redacted, newline)?;
            writer.flush()?;
        }
    }
    Ok(())
}
