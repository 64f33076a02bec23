// promptscrub-core/src/pipeline.rs
//! The two entry points of the library: detection for previews, and the full
//! detect-merge-redact pipeline.
//!
//! Pattern detection and model classification run concurrently; the merge
//! waits for both. A model that is missing, slow or broken only removes its
//! own contribution, so the pipeline always returns at least the
//! pattern-redacted text.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;

use crate::config::ScrubConfig;
use crate::engine::ModelLoader;
use crate::engines::http_classifier::HttpModelLoader;
use crate::engines::model_engine::ModelAdapter;
use crate::engines::model_handle::ModelHandle;
use crate::engines::pattern_engine::PatternDetector;
use crate::entity::ResolvedEntity;
use crate::merger::merge;
use crate::normalize::normalize_prompt;
use crate::placeholders::PlaceholderMap;
use crate::redactor::{redact_with_policy, RedactionPolicy};

/// Redacted text plus the entities it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionReport {
    pub redacted: String,
    pub entities: Vec<ResolvedEntity>,
}

/// A configured detection and redaction pipeline. Cheap to clone; clones
/// share the model handle.
#[derive(Debug, Clone)]
pub struct Scrubber {
    config: ScrubConfig,
    patterns: PatternDetector,
    model: ModelAdapter,
}

impl Scrubber {
    /// Builds the pipeline, wiring up the HTTP classifier when the
    /// configuration names an endpoint. The model is not contacted until
    /// first use.
    pub fn new(config: ScrubConfig) -> Result<Self> {
        config.validate()?;
        let model = match HttpModelLoader::from_config(&config.model) {
            Some(loader) => {
                info!("Model pass enabled via {}", loader.describe());
                ModelAdapter::new(ModelHandle::new(Arc::new(loader)), &config.model)
            }
            None => {
                debug!("No model endpoint configured; pattern detection only.");
                ModelAdapter::disabled()
            }
        };
        Ok(Self::assemble(config, model))
    }

    /// A pipeline that never consults a model.
    pub fn pattern_only(config: ScrubConfig) -> Self {
        Self::assemble(config, ModelAdapter::disabled())
    }

    /// A pipeline around an existing model handle, e.g. one shared between
    /// several pipelines.
    pub fn with_model(config: ScrubConfig, handle: ModelHandle) -> Self {
        let model = ModelAdapter::new(handle, &config.model);
        Self::assemble(config, model)
    }

    fn assemble(config: ScrubConfig, model: ModelAdapter) -> Self {
        let patterns = PatternDetector::new(&config.detectors);
        Self {
            config,
            patterns,
            model,
        }
    }

    pub fn config(&self) -> &ScrubConfig {
        &self.config
    }

    pub fn model_handle(&self) -> Option<&ModelHandle> {
        self.model.handle()
    }

    fn prepare<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.config.normalize_input {
            Cow::Owned(normalize_prompt(text))
        } else {
            Cow::Borrowed(text)
        }
    }

    async fn detect_prepared(&self, text: &str) -> Vec<ResolvedEntity> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let (pattern_candidates, classification) =
            tokio::join!(async { self.patterns.detect(text) }, self.model.classify(text));

        if !classification.is_available() {
            debug!("Model contributed no candidates for this input.");
        }
        merge(pattern_candidates, classification.into_candidates())
    }

    /// Runs detection and merging only, for previews.
    pub async fn detect_entities(&self, text: &str) -> Vec<ResolvedEntity> {
        let text = self.prepare(text);
        self.detect_prepared(&text).await
    }

    /// Full pipeline with caller-supplied placeholders, layered over the
    /// built-in defaults.
    pub async fn redact_text(&self, text: &str, placeholders: &PlaceholderMap) -> String {
        self.run(text, placeholders).await.redacted
    }

    /// Full pipeline with the configured placeholders.
    pub async fn redact(&self, text: &str) -> String {
        self.run(text, &self.config.placeholders).await.redacted
    }

    /// Full pipeline with the configured placeholders, keeping the entities.
    pub async fn redact_with_report(&self, text: &str) -> RedactionReport {
        self.run(text, &self.config.placeholders).await
    }

    async fn run(&self, text: &str, placeholders: &PlaceholderMap) -> RedactionReport {
        let text = self.prepare(text);
        let entities = self.detect_prepared(&text).await;
        let policy = RedactionPolicy::from_config(&self.config);
        let redacted = redact_with_policy(&text, &entities, placeholders, &policy);
        debug!("Pipeline finished with {} entit(ies).", entities.len());
        RedactionReport { redacted, entities }
    }
}
