// promptscrub-core/src/engines/model_engine.rs
//! The statistical half of detection.
//!
//! [`ModelAdapter::classify`] never fails. Load errors, inference errors and
//! timeouts all collapse into [`Classification::Unavailable`], which the
//! pipeline treats as "zero model candidates".
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use std::time::Duration;

use crate::config::ModelConfig;
use crate::engines::model_handle::ModelHandle;
use crate::entity::{log_candidate_debug, CandidateEntity};

/// Result of one classification attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Available(Vec<CandidateEntity>),
    Unavailable,
}

impl Classification {
    /// Candidates to feed the merger; empty when the model was unavailable.
    pub fn into_candidates(self) -> Vec<CandidateEntity> {
        match self {
            Classification::Available(candidates) => candidates,
            Classification::Unavailable => Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Classification::Available(_))
    }
}

/// Wraps a [`ModelHandle`] with bounded patience.
#[derive(Debug, Clone)]
pub struct ModelAdapter {
    handle: Option<ModelHandle>,
    load_timeout: Duration,
    timeout: Duration,
}

impl ModelAdapter {
    pub fn new(handle: ModelHandle, config: &ModelConfig) -> Self {
        Self {
            handle: Some(handle),
            load_timeout: config.load_timeout(),
            timeout: config.timeout(),
        }
    }

    /// An adapter with no model behind it; every call is `Unavailable`.
    pub fn disabled() -> Self {
        Self {
            handle: None,
            load_timeout: Duration::ZERO,
            timeout: Duration::ZERO,
        }
    }

    pub fn handle(&self) -> Option<&ModelHandle> {
        self.handle.as_ref()
    }

    pub async fn classify(&self, text: &str) -> Classification {
        let Some(handle) = &self.handle else {
            debug!("No classification model configured; skipping model pass.");
            return Classification::Unavailable;
        };

        let classifier = match tokio::time::timeout(self.load_timeout, handle.acquire()).await {
            Ok(Ok(classifier)) => classifier,
            Ok(Err(e)) => {
                warn!("{}. Continuing with pattern detection only.", e);
                return Classification::Unavailable;
            }
            Err(_) => {
                warn!(
                    "Classification model not ready within {:?}. Continuing with pattern detection only.",
                    self.load_timeout
                );
                return Classification::Unavailable;
            }
        };

        match tokio::time::timeout(self.timeout, classifier.predict(text)).await {
            Ok(Ok(candidates)) => {
                debug!(
                    "Model '{}' produced {} token prediction(s).",
                    classifier.name(),
                    candidates.len()
                );
                for candidate in &candidates {
                    log_candidate_debug(module_path!(), "model", candidate);
                }
                Classification::Available(candidates)
            }
            Ok(Err(e)) => {
                warn!("Model '{}' inference failed: {:#}", classifier.name(), e);
                Classification::Unavailable
            }
            Err(_) => {
                warn!(
                    "Model '{}' did not answer within {:?}; ignoring its output.",
                    classifier.name(),
                    self.timeout
                );
                Classification::Unavailable
            }
        }
    }
}
