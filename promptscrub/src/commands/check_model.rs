// promptscrub/src/commands/check_model.rs
//! `promptscrub check-model`: loads the model and classifies a fixed sentence,
//! surfacing the failure instead of silently falling back to patterns.

use anyhow::{bail, Context, Result};
use log::debug;
use std::sync::Arc;

use promptscrub_core::{merge, HttpModelLoader, ModelHandle, TokenClassifier};

use super::{resolve_config, success_msg};
use crate::cli::CheckModelCommand;

pub const SAMPLE_SENTENCE: &str =
    "Hello, my name is John Doe and my email is john.doe@example.com";

pub async fn run_check_model(cmd: CheckModelCommand, quiet: bool) -> Result<()> {
    let config = resolve_config(cmd.config.as_deref(), &cmd.model)?;
    let Some(loader) = HttpModelLoader::from_config(&config.model) else {
        bail!(
            "No model endpoint configured. Pass --model-endpoint or set PROMPTSCRUB_MODEL_ENDPOINT."
        );
    };

    let handle = ModelHandle::new(Arc::new(loader));
    let classifier = tokio::time::timeout(config.model.load_timeout(), handle.acquire())
        .await
        .context("Timed out waiting for the model to load")?
        .context("Model failed to load")?;

    let predictions = tokio::time::timeout(config.model.timeout(), classifier.predict(SAMPLE_SENTENCE))
        .await
        .context("Timed out waiting for the model to answer")?
        .context("Model inference failed")?;
    debug!("Sample sentence produced {} token prediction(s).", predictions.len());

    let entities = merge(Vec::new(), predictions.clone());
    if !quiet {
        success_msg(format!(
            "Model is working: {} token prediction(s), {} entit(ies) found in the sample sentence.",
            predictions.len(),
            entities.len()
        ));
        for entity in &entities {
            println!("{}\t{}\t{:.2}", entity.category, entity.text, entity.confidence);
        }
    }
    Ok(())
}
