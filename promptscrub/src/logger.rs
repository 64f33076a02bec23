// promptscrub/src/logger.rs
//! Logger setup for the CLI. Logs go to stderr so they never mix with the
//! redacted prompt on stdout.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes `env_logger`.
///
/// `RUST_LOG` is honoured (default `warn`) unless `level` forces a level,
/// as `--quiet` and `--debug` do. Calling this twice is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder
        .target(Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .try_init()
        .ok();
}

/// Maps the global `--quiet` / `--debug` flags to a forced level.
pub fn level_for_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if debug {
        Some(LevelFilter::Debug)
    } else if quiet {
        Some(LevelFilter::Off)
    } else {
        None
    }
}
