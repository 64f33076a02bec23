// promptscrub-core/src/entity.rs
//! Entity records shared by every stage of the pipeline, plus the helpers that
//! keep detected text out of debug logs.
//!
//! A [`CandidateEntity`] is what a detector reports before reconciliation, be it
//! a whole regex match (`"EMAIL"`) or a single sub-word token from the model
//! (`"B-PER"`, `"I-PER"`, `"O"`). A [`ResolvedEntity`] is what the merger hands
//! to the redactor: a whole entity with its BIO prefix removed.

use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Read once: whether debug logs may show the matched text verbatim.
static PII_DEBUG_ALLOWED: Lazy<bool> = Lazy::new(|| {
    std::env::var("PROMPTSCRUB_ALLOW_DEBUG_PII")
        .map(|s| s.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
});

/// The tag that marks a token as outside any entity.
pub const OUTSIDE_TAG: &str = "O";

/// An unreconciled detection from either the pattern battery or the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEntity {
    /// Plain category (`"EMAIL"`) or BIO-prefixed tag (`"B-PER"`, `"I-PER"`, `"O"`).
    pub entity_tag: String,
    /// The matched substring; for model output, possibly a sub-word fragment.
    pub text: String,
    /// Score in `[0, 1]`.
    pub confidence: f64,
    /// Half-open character offsets into the source text, when the producer tracks them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

/// How a candidate's tag participates in BIO grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind<'a> {
    /// `B-<category>`: opens a new span.
    Begin(&'a str),
    /// `I-<category>`: continues a span of the same category.
    Inside(&'a str),
    /// Exactly `O`.
    Outside,
    /// Anything else: an already-whole entity.
    Plain(&'a str),
}

impl CandidateEntity {
    pub fn new(entity_tag: impl Into<String>, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            entity_tag: entity_tag.into(),
            text: text.into(),
            confidence,
            start: None,
            end: None,
        }
    }

    /// Attaches a position. A reversed span is discarded rather than stored,
    /// so `start <= end` holds whenever both are present.
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        if start <= end {
            self.start = Some(start);
            self.end = Some(end);
        }
        self
    }

    pub fn tag_kind(&self) -> TagKind<'_> {
        let tag = self.entity_tag.as_str();
        if tag == OUTSIDE_TAG {
            TagKind::Outside
        } else if let Some(category) = tag.strip_prefix("B-") {
            TagKind::Begin(category)
        } else if let Some(category) = tag.strip_prefix("I-") {
            TagKind::Inside(category)
        } else {
            TagKind::Plain(tag)
        }
    }
}

/// A deduplicated, fully reconstructed entity ready for redaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    /// Category without any BIO prefix (`"PER"`, `"EMAIL"`, ...).
    pub category: String,
    /// Full surface form, whitespace-trimmed.
    pub text: String,
    /// Minimum confidence across the constituent candidates.
    pub confidence: f64,
}

impl ResolvedEntity {
    pub fn new(category: impl Into<String>, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
            confidence,
        }
    }

    /// Category compared case-insensitively everywhere, so this is the key form.
    pub fn category_key(&self) -> String {
        self.category.to_uppercase()
    }
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    let len = s.chars().count();
    if len <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", len)
    }
}

/// Text as it may appear in a log line under the current PII policy.
pub fn loggable(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_candidate_debug(module_path: &str, source: &str, candidate: &CandidateEntity) {
    debug!(
        "{} {} candidate: tag='{}', text='{}', confidence={:.2}, span={:?}..{:?}",
        module_path,
        source,
        candidate.entity_tag,
        loggable(&candidate.text),
        candidate.confidence,
        candidate.start,
        candidate.end
    );
}

pub fn log_substitution_debug(module_path: &str, entity: &ResolvedEntity, placeholder: &str) {
    debug!(
        "{} Substituting {} '{}' (confidence {:.2}) with '{}'",
        module_path,
        entity.category,
        loggable(&entity.text),
        entity.confidence,
        placeholder
    );
}
