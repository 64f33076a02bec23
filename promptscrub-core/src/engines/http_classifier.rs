// promptscrub-core/src/engines/http_classifier.rs
//! A [`TokenClassifier`] backed by a token-classification inference endpoint.
//!
//! The endpoint receives `{"inputs": <text>, "parameters": {"aggregation_strategy": "none"}}`
//! and answers with one prediction per sub-word token:
//!
//! ```json
//! [{"entity": "B-PER", "score": 0.998, "word": "John", "start": 11, "end": 15}]
//! ```
//!
//! Grouped responses (`entity_group` instead of `entity`) are accepted too.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ModelConfig;
use crate::engine::{ModelLoader, TokenClassifier};
use crate::entity::CandidateEntity;
use crate::errors::ScrubError;

const USER_AGENT: &str = concat!("promptscrub/", env!("CARGO_PKG_VERSION"));

/// Text sent once while loading, to prove the endpoint answers.
const PROBE_TEXT: &str = "My name is John.";

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
    parameters: ClassifyParameters,
}

#[derive(Debug, Serialize)]
struct ClassifyParameters {
    aggregation_strategy: &'static str,
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    #[serde(alias = "entity_group")]
    entity: String,
    score: f64,
    word: String,
    #[serde(default)]
    start: Option<usize>,
    #[serde(default)]
    end: Option<usize>,
}

impl RawPrediction {
    fn into_candidate(self) -> CandidateEntity {
        let candidate = CandidateEntity::new(self.entity, self.word, self.score.clamp(0.0, 1.0));
        match (self.start, self.end) {
            (Some(start), Some(end)) => candidate.with_span(start, end),
            _ => candidate,
        }
    }
}

pub struct HttpTokenClassifier {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HttpTokenClassifier {
    pub fn new(client: Client, endpoint: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_token,
        }
    }

    async fn request(&self, text: &str) -> Result<Vec<RawPrediction>, ScrubError> {
        let body = ClassifyRequest {
            inputs: text,
            parameters: ClassifyParameters {
                aggregation_strategy: "none",
            },
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("User-Agent", USER_AGENT)
            .json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(ScrubError::ClassifierResponse(format!(
                "HTTP {} from {}: {}",
                status,
                self.endpoint,
                detail.chars().take(200).collect::<String>()
            )));
        }

        resp.json::<Vec<RawPrediction>>()
            .await
            .map_err(|e| ScrubError::ClassifierResponse(format!("malformed predictions: {}", e)))
    }
}

#[async_trait]
impl TokenClassifier for HttpTokenClassifier {
    fn name(&self) -> &str {
        "http"
    }

    async fn predict(&self, text: &str) -> Result<Vec<CandidateEntity>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let predictions = self.request(text).await?;
        debug!("Endpoint returned {} prediction(s).", predictions.len());
        Ok(predictions
            .into_iter()
            .filter(|p| !p.entity.is_empty())
            .map(RawPrediction::into_candidate)
            .collect())
    }
}

/// Builds an [`HttpTokenClassifier`] and checks the endpoint answers before
/// declaring the model ready.
pub struct HttpModelLoader {
    endpoint: String,
    api_token: Option<String>,
    timeout: Duration,
}

impl HttpModelLoader {
    pub fn new(endpoint: impl Into<String>, api_token: Option<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token,
            timeout,
        }
    }

    /// `None` when the configuration does not name a usable endpoint.
    pub fn from_config(config: &ModelConfig) -> Option<Self> {
        config
            .active_endpoint()
            .map(|endpoint| Self::new(endpoint, config.api_token.clone(), config.timeout()))
    }
}

#[async_trait]
impl ModelLoader for HttpModelLoader {
    fn describe(&self) -> String {
        format!("inference endpoint {}", self.endpoint)
    }

    async fn load(&self) -> Result<Arc<dyn TokenClassifier>> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client for the classification endpoint")?;
        let classifier = HttpTokenClassifier::new(client, self.endpoint.clone(), self.api_token.clone());

        classifier
            .request(PROBE_TEXT)
            .await
            .with_context(|| format!("Classification endpoint {} did not answer the probe", self.endpoint))?;
        info!("Classification endpoint {} is reachable.", self.endpoint);

        Ok(Arc::new(classifier))
    }
}
