// promptscrub-core/src/engine.rs
//! Defines the seam between the pipeline and the token-classification model.
//!
//! The pipeline never knows how the model is hosted. It talks to a
//! [`TokenClassifier`] obtained from a [`ModelLoader`]; the loader is invoked
//! at most once at a time by the [`ModelHandle`](crate::engines::model_handle::ModelHandle),
//! which owns the load lifecycle.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::entity::CandidateEntity;

/// A loaded token-classification model.
///
/// Implementations translate the model's native output 1:1 into
/// [`CandidateEntity`] values: the BIO-prefixed tag is kept as is, and
/// positions are attached when the model reports them.
#[async_trait]
pub trait TokenClassifier: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Classifies every token of `text`.
    async fn predict(&self, text: &str) -> Result<Vec<CandidateEntity>>;
}

/// Produces a ready [`TokenClassifier`]; may be slow and may fail.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    fn describe(&self) -> String;

    async fn load(&self) -> Result<Arc<dyn TokenClassifier>>;
}

/// A loader for a classifier that already exists in memory.
pub struct StaticModelLoader {
    classifier: Arc<dyn TokenClassifier>,
}

impl StaticModelLoader {
    pub fn new(classifier: Arc<dyn TokenClassifier>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl ModelLoader for StaticModelLoader {
    fn describe(&self) -> String {
        format!("in-memory classifier '{}'", self.classifier.name())
    }

    async fn load(&self) -> Result<Arc<dyn TokenClassifier>> {
        Ok(Arc::clone(&self.classifier))
    }
}
