// promptscrub-core/tests/pipeline_tests.rs
use anyhow::Result;
use std::sync::Arc;

use promptscrub_core::{
    CandidateEntity, ModelHandle, ModelState, PlaceholderMap, ResolvedEntity, ScrubConfig, Scrubber,
    TokenClassifier,
};

const SUB_WORD_PREDICTIONS: &str = r#"[
    {"entity": "B-PER", "score": 0.9991, "word": "John", "start": 18, "end": 22},
    {"entity": "I-PER", "score": 0.9987, "word": " Doe", "start": 22, "end": 26},
    {"entity": "B-ORG", "score": 0.9712, "word": "Ac", "start": 41, "end": 43},
    {"entity": "I-ORG", "score": 0.9650, "word": "me", "start": 43, "end": 45},
    {"entity": "B-SEX", "score": 0.9100, "word": "male", "start": 51, "end": 55}
]"#;

const PROMPT: &str = "Hello, my name is John Doe and I work at Acme. I'm male, write to jd@acme.io";

fn config_for(endpoint: &str) -> ScrubConfig {
    let mut config = ScrubConfig::default();
    config.model.endpoint = Some(endpoint.to_string());
    config.model.timeout_ms = 2_000;
    config.model.load_timeout_ms = 2_000;
    config
}

#[test_log::test(tokio::test)]
async fn test_model_entities_join_pattern_entities() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SUB_WORD_PREDICTIONS)
        .expect_at_least(2)
        .create_async()
        .await;

    let scrubber = Scrubber::new(config_for(&server.url()))?;
    let report = scrubber.redact_with_report(PROMPT).await;

    let categories: Vec<&str> = report.entities.iter().map(|e| e.category.as_str()).collect();
    assert_eq!(categories, vec!["PER", "ORG", "SEX", "EMAIL"]);
    assert_eq!(report.entities[1], ResolvedEntity::new("ORG", "Acme", 0.9650));
    assert_eq!(
        report.redacted,
        "Hello, my name is [PERSON] and I work at [ORGANIZATION]. I'm male, write to [email@gmail.com]"
    );
    assert_eq!(scrubber.model_handle().map(|h| h.state()), Some(ModelState::Ready));

    // One probe request while loading, then one per classification.
    mock.assert_async().await;
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_failing_endpoint_falls_back_to_patterns() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(500)
        .create_async()
        .await;

    let scrubber = Scrubber::new(config_for(&server.url()))?;
    let entities = scrubber.detect_entities("Reach me at a@b.com").await;
    assert_eq!(entities, vec![ResolvedEntity::new("EMAIL", "a@b.com", 0.98)]);
    assert!(matches!(
        scrubber.model_handle().map(|h| h.state()),
        Some(ModelState::Failed(_))
    ));
    Ok(())
}

struct FragmentClassifier;

#[async_trait::async_trait]
impl TokenClassifier for FragmentClassifier {
    fn name(&self) -> &str {
        "fragments"
    }

    async fn predict(&self, _text: &str) -> Result<Vec<CandidateEntity>> {
        Ok(vec![
            CandidateEntity::new("B-PER", "Jo", 0.95).with_span(0, 2),
            CandidateEntity::new("I-PER", "##hn", 0.93).with_span(2, 4),
            CandidateEntity::new("O", " called", 0.99).with_span(4, 11),
            CandidateEntity::new("B-PER", "Jo", 0.40).with_span(12, 14),
        ])
    }
}

#[tokio::test]
async fn test_shared_handle_across_pipelines() {
    let handle = ModelHandle::ready(Arc::new(FragmentClassifier));
    let strict = Scrubber::with_model(ScrubConfig::default(), handle.clone());
    let lenient = Scrubber::with_model(
        ScrubConfig {
            min_confidence: 0.3,
            ..ScrubConfig::default()
        },
        handle,
    );

    let text = "John called Jo";
    let placeholders = PlaceholderMap::defaults();

    // Sub-word markers are kept as emitted, so "Jo##hn" never matches the text.
    let entities = strict.detect_entities(text).await;
    assert_eq!(
        entities,
        vec![
            ResolvedEntity::new("PER", "Jo##hn", 0.93),
            ResolvedEntity::new("PER", "Jo", 0.40),
        ]
    );
    assert_eq!(strict.redact_text(text, &placeholders).await, "John called Jo");
    assert_eq!(
        lenient.redact_text(text, &placeholders).await,
        "[PERSON]hn called [PERSON]"
    );
}
