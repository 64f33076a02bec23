// promptscrub-core/src/redactor.rs
//! Substitutes resolved entities in text with placeholders.
//!
//! Substitution is a fold over the qualifying entities, longest text first,
//! so a full name is replaced before a first name that is a substring of it.
//! Each step is a global, case-insensitive, literal replacement.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{NoExpand, RegexBuilder};

use crate::config::{ScrubConfig, ALWAYS_EXCLUDED_CATEGORY, DEFAULT_MIN_CONFIDENCE};
use crate::entity::{log_substitution_debug, ResolvedEntity};
use crate::placeholders::PlaceholderMap;

/// Which entities may be substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct RedactionPolicy {
    pub min_confidence: f64,
    /// Extra categories left in place (compared case-insensitively).
    /// `SEX` is excluded whether or not it is listed.
    pub excluded_categories: Vec<String>,
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            excluded_categories: Vec::new(),
        }
    }
}

impl RedactionPolicy {
    pub fn with_min_confidence(min_confidence: f64) -> Self {
        Self {
            min_confidence,
            ..Self::default()
        }
    }

    pub fn from_config(config: &ScrubConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            excluded_categories: config.excluded_categories.clone(),
        }
    }

    fn is_excluded(&self, category: &str) -> bool {
        category.eq_ignore_ascii_case(ALWAYS_EXCLUDED_CATEGORY)
            || self
                .excluded_categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category))
    }

    /// Whether `entity` passes the category and confidence filters.
    pub fn admits(&self, entity: &ResolvedEntity) -> bool {
        if entity.text.is_empty() {
            return false;
        }
        if self.is_excluded(&entity.category) {
            debug!("Skipping {} entity: category is excluded.", entity.category);
            return false;
        }
        if entity.confidence < self.min_confidence {
            debug!(
                "Skipping {} entity: confidence {:.2} below {:.2}.",
                entity.category, entity.confidence, self.min_confidence
            );
            return false;
        }
        true
    }
}

/// Replaces every case-insensitive occurrence of `needle` in `haystack`.
/// On a regex build failure the text is returned unchanged.
fn replace_literal(haystack: &str, needle: &str, replacement: &str) -> String {
    match RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .size_limit(10 * (1 << 20))
        .build()
    {
        Ok(re) => re.replace_all(haystack, NoExpand(replacement)).into_owned(),
        Err(e) => {
            warn!("Could not build a matcher for an entity ({}); leaving it in place.", e);
            haystack.to_string()
        }
    }
}

/// Redacts `text` under `policy`. Entities that no longer occur in the
/// working text (already consumed by a longer one) are no-ops.
pub fn redact_with_policy(
    text: &str,
    entities: &[ResolvedEntity],
    placeholders: &PlaceholderMap,
    policy: &RedactionPolicy,
) -> String {
    let mut qualifying: Vec<&ResolvedEntity> = entities.iter().filter(|e| policy.admits(e)).collect();
    if qualifying.is_empty() {
        return text.to_string();
    }

    qualifying.sort_by(|a, b| b.text.chars().count().cmp(&a.text.chars().count()));

    let redacted = qualifying.into_iter().fold(text.to_string(), |working, entity| {
        let placeholder = placeholders.lookup(&entity.category);
        log_substitution_debug(module_path!(), entity, &placeholder);
        replace_literal(&working, &entity.text, &placeholder)
    });

    debug!("Redaction complete.");
    redacted
}

/// Redacts `text`, leaving out `SEX` entities and those scoring below
/// `min_confidence`.
pub fn redact(
    text: &str,
    entities: &[ResolvedEntity],
    placeholders: &PlaceholderMap,
    min_confidence: f64,
) -> String {
    redact_with_policy(
        text,
        entities,
        placeholders,
        &RedactionPolicy::with_min_confidence(min_confidence),
    )
}
