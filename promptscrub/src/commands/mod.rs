// promptscrub/src/commands/mod.rs
//! Command implementations, plus the input and configuration plumbing they
//! share.

pub mod check_model;
pub mod config;
pub mod redact;
pub mod scan;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::debug;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use promptscrub_core::{load_effective_config, ScrubConfig};

use crate::cli::ModelArgs;
use crate::ui::output_format;

/// Reads the whole input from `path`, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            debug!("Reading input from file: {}", path.display());
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            debug!("Reading input from stdin.");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Loads the effective configuration and applies the command-line model
/// overrides on top of it.
pub fn resolve_config(config_path: Option<&Path>, model: &ModelArgs) -> Result<ScrubConfig> {
    let mut config = load_effective_config(config_path)?;
    apply_model_args(&mut config, model);
    Ok(config)
}

pub fn apply_model_args(config: &mut ScrubConfig, model: &ModelArgs) {
    if let Some(endpoint) = &model.model_endpoint {
        debug!("Model endpoint taken from the command line or environment.");
        config.model.endpoint = Some(endpoint.clone());
    }
    if let Some(token) = &model.model_token {
        config.model.api_token = Some(token.clone());
    }
    if model.no_model {
        debug!("Model pass disabled by --no-model.");
        config.model.enabled = false;
    }
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), supports_color);
}

/// Helper for printing success messages to stderr.
pub fn success_msg(msg: impl AsRef<str>) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_success_message(&mut io::stderr(), msg.as_ref(), supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), supports_color);
}
