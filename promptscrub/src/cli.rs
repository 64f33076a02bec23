// promptscrub/src/cli.rs
//! This file defines the command-line interface (CLI) for the promptscrub
//! application, including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "promptscrub",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Strip personal information from a prompt before it leaves your machine",
    long_about = "promptscrub finds personal information in a chat prompt (names, organizations, locations, emails, phone numbers, addresses and more) and replaces it with placeholders. A deterministic pattern pass always runs; a token-classification model adds names and organizations when an inference endpoint is configured.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `promptscrub` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redacts an input file or stdin, writing the scrubbed prompt.
    #[command(about = "Redacts an input file or stdin, writing the scrubbed prompt.")]
    Redact(RedactCommand),

    /// Lists the entities that would be redacted, without redacting.
    #[command(about = "Lists the entities found in the input without redacting it.")]
    Scan(ScanCommand),

    /// Sends a fixed sample sentence to the model endpoint and reports the result.
    #[command(name = "check-model", about = "Checks that the classification model endpoint works.")]
    CheckModel(CheckModelCommand),

    /// Inspects the effective configuration.
    #[command(subcommand, about = "Inspects the effective configuration.")]
    Config(ConfigCommand),
}

/// Where the token-classification model lives.
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Token-classification inference endpoint.
    #[arg(
        long = "model-endpoint",
        value_name = "URL",
        env = "PROMPTSCRUB_MODEL_ENDPOINT",
        help = "Token-classification inference endpoint (overrides the configuration file)."
    )]
    pub model_endpoint: Option<String>,

    /// Bearer token for the endpoint.
    #[arg(
        long = "model-token",
        value_name = "TOKEN",
        env = "PROMPTSCRUB_MODEL_TOKEN",
        hide_env_values = true,
        help = "Bearer token sent to the inference endpoint."
    )]
    pub model_token: Option<String>,

    /// Skip the model pass entirely.
    #[arg(long = "no-model", help = "Use pattern detection only, even if a model endpoint is configured.")]
    pub no_model: bool,
}

/// Arguments for the `redact` command.
#[derive(Parser, Debug)]
pub struct RedactCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write redacted output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Path to a custom configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Placeholder overrides, e.g. `--placeholder EMAIL=<mail>`.
    #[arg(
        long = "placeholder",
        short = 'p',
        value_name = "CATEGORY=TEXT",
        value_parser = parse_placeholder,
        help = "Replace entities of CATEGORY with TEXT (repeatable)."
    )]
    pub placeholders: Vec<(String, String)>,

    /// Minimum confidence an entity needs to be redacted.
    #[arg(long = "min-confidence", value_name = "SCORE", value_parser = parse_confidence, help = "Minimum confidence (0-1) an entity needs to be redacted.")]
    pub min_confidence: Option<f64>,

    /// Clean editor markup out of the input first.
    #[arg(long, help = "Strip editor markup, carriage returns and surrounding whitespace before redacting.")]
    pub normalize: bool,

    /// Print a summary of what was redacted to stderr.
    #[arg(long = "no-summary", help = "Suppress the redaction summary on stderr.")]
    pub no_summary: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Path to a custom configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Print the entities as JSON instead of a table.
    #[arg(long, help = "Print the detected entities to stdout as JSON.")]
    pub json: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the `check-model` command.
#[derive(Parser, Debug)]
pub struct CheckModelCommand {
    /// Path to a custom configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom configuration file (YAML).")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Subcommands for the `config` command.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    #[command(about = "Prints the effective configuration (defaults merged with any user file) as YAML.")]
    Show {
        /// Path to a custom configuration file (YAML).
        #[arg(long = "config", value_name = "FILE", help = "Path to a custom configuration file (YAML).")]
        config: Option<PathBuf>,
    },
    #[command(about = "Lists the locations searched for a configuration file.")]
    Paths,
}

/// Parses `CATEGORY=TEXT`. The text may itself contain `=`.
pub fn parse_placeholder(raw: &str) -> Result<(String, String), String> {
    let (category, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=TEXT, got '{}'", raw))?;
    let category = category.trim();
    if category.is_empty() {
        return Err(format!("missing category in '{}'", raw));
    }
    Ok((category.to_uppercase(), text.to_string()))
}

fn parse_confidence(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("confidence must lie in [0, 1], got {}", value))
    }
}
