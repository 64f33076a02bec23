// promptscrub/src/commands/scan.rs
//! `promptscrub scan`: previews what `redact` would replace.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use std::io::{self, Write};

use promptscrub_core::{RedactionPolicy, Scrubber};

use super::{info_msg, read_input, resolve_config};
use crate::cli::ScanCommand;
use crate::ui::entity_table::build_entity_table;

pub async fn run_scan(cmd: ScanCommand, quiet: bool) -> Result<()> {
    let config = resolve_config(cmd.config.as_deref(), &cmd.model)?;
    let input = read_input(cmd.input_file.as_deref())?;
    let scrubber = Scrubber::new(config).context("Failed to set up the detection pipeline")?;

    let entities = scrubber.detect_entities(&input).await;

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if cmd.json {
        let json = serde_json::to_string_pretty(&entities).context("Failed to serialize entities")?;
        writeln!(writer, "{}", json)?;
        return Ok(());
    }

    if entities.is_empty() {
        if !quiet {
            info_msg("No personal information detected.");
        }
        return Ok(());
    }

    let config = scrubber.config();
    let table = build_entity_table(
        &entities,
        &config.placeholders,
        &RedactionPolicy::from_config(config),
        stdout.is_terminal(),
    );
    writeln!(writer, "{}", table)?;
    Ok(())
}
