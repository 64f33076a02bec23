// promptscrub-core/src/headless.rs
//! Convenience wrapper for one-shot, non-interactive redaction.

use anyhow::Result;

use crate::config::ScrubConfig;
use crate::pipeline::Scrubber;

/// Builds a pipeline from `config` and redacts `content` with the configured
/// placeholders. The model pass runs only if the configuration names an
/// endpoint; when it is unreachable the result is pattern-redacted.
///
/// Fails only on an invalid configuration.
pub async fn headless_redact_string(config: ScrubConfig, content: &str) -> Result<String> {
    let scrubber = Scrubber::new(config)?;
    Ok(scrubber.redact(content).await)
}
