// promptscrub/src/lib.rs
//! # PromptScrub CLI Application
//!
//! Command-line front end for `promptscrub-core`: redact a prompt, preview
//! what would be redacted, check the model endpoint, and inspect the
//! effective configuration.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
