// promptscrub-core/src/merger.rs
//! Reconciles pattern and model candidates into a single entity list.
//!
//! Model output arrives one sub-word token at a time, tagged with a BIO
//! prefix (`B-PER`, `I-PER`, `O`). Pattern output arrives as whole entities
//! with plain categories. One left-to-right pass over the positionally sorted
//! candidates handles both: BIO runs are stitched back into whole entities and
//! plain tags pass straight through.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use std::collections::HashMap;

use crate::entity::{loggable, CandidateEntity, ResolvedEntity, TagKind};

/// Span being accumulated from `B-`/`I-` tokens.
#[derive(Debug)]
struct OpenSpan {
    category: String,
    text: String,
    confidence: f64,
}

/// Collects emitted entities, folding duplicates into the first occurrence.
#[derive(Debug, Default)]
struct EntityCollector {
    entities: Vec<ResolvedEntity>,
    /// `(uppercase category, text)` -> index into `entities`.
    seen: HashMap<(String, String), usize>,
}

impl EntityCollector {
    fn emit(&mut self, category: &str, text: &str, confidence: f64) {
        let text = text.trim();
        if text.is_empty() {
            debug!("Dropping {} entity with no text.", category);
            return;
        }

        let key = (category.to_uppercase(), text.to_string());
        match self.seen.get(&key) {
            Some(&index) => {
                let existing = &mut self.entities[index];
                existing.confidence = existing.confidence.min(confidence);
                debug!(
                    "Duplicate {} entity '{}' folded into earlier occurrence.",
                    category,
                    loggable(text)
                );
            }
            None => {
                self.seen.insert(key, self.entities.len());
                self.entities.push(ResolvedEntity::new(category, text, confidence));
            }
        }
    }

    fn close(&mut self, span: Option<OpenSpan>) {
        if let Some(span) = span {
            self.emit(&span.category, &span.text, span.confidence);
        }
    }
}

/// Orders candidates by `start`, stably. Candidates without a position keep
/// their slot in the input order; only positioned candidates are permuted
/// among the positioned slots.
fn sort_by_position(candidates: Vec<CandidateEntity>) -> Vec<CandidateEntity> {
    let mut slots: Vec<Option<CandidateEntity>> = Vec::with_capacity(candidates.len());
    let mut positioned: Vec<(usize, CandidateEntity)> = Vec::new();

    for candidate in candidates {
        match candidate.start {
            Some(start) => {
                positioned.push((start, candidate));
                slots.push(None);
            }
            None => slots.push(Some(candidate)),
        }
    }

    positioned.sort_by_key(|(start, _)| *start);
    let mut positioned = positioned.into_iter().map(|(_, c)| c);

    slots
        .into_iter()
        .filter_map(|slot| slot.or_else(|| positioned.next()))
        .collect()
}

/// Merges both candidate streams into deduplicated, whole entities.
///
/// Model candidates are placed ahead of pattern candidates before sorting,
/// so at equal offsets a model token is scanned first.
pub fn merge(
    pattern_candidates: Vec<CandidateEntity>,
    model_candidates: Vec<CandidateEntity>,
) -> Vec<ResolvedEntity> {
    let total = pattern_candidates.len() + model_candidates.len();
    let mut combined = model_candidates;
    combined.extend(pattern_candidates);
    let sorted = sort_by_position(combined);

    let mut collector = EntityCollector::default();
    let mut open: Option<OpenSpan> = None;

    for candidate in &sorted {
        match candidate.tag_kind() {
            TagKind::Begin(category) => {
                collector.close(open.take());
                open = Some(OpenSpan {
                    category: category.to_string(),
                    text: candidate.text.clone(),
                    confidence: candidate.confidence,
                });
            }
            TagKind::Inside(category) => match open.as_mut() {
                Some(span) if span.category == category => {
                    span.text.push_str(&candidate.text);
                    span.confidence = span.confidence.min(candidate.confidence);
                }
                _ => collector.close(open.take()),
            },
            TagKind::Outside => collector.close(open.take()),
            TagKind::Plain(category) => {
                collector.close(open.take());
                collector.emit(category, &candidate.text, candidate.confidence);
            }
        }
    }
    collector.close(open.take());

    debug!(
        "Merged {} candidate(s) into {} entit(ies).",
        total,
        collector.entities.len()
    );
    collector.entities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(tag: &str, text: &str, confidence: f64) -> CandidateEntity {
        CandidateEntity::new(tag, text, confidence)
    }

    fn at(tag: &str, text: &str, confidence: f64, start: usize) -> CandidateEntity {
        CandidateEntity::new(tag, text, confidence).with_span(start, start + text.len())
    }

    fn pairs(entities: &[ResolvedEntity]) -> Vec<(&str, &str)> {
        entities
            .iter()
            .map(|e| (e.category.as_str(), e.text.as_str()))
            .collect()
    }

    #[test]
    fn test_bio_tokens_are_concatenated() {
        let merged = merge(vec![], vec![c("B-PER", "John", 0.9), c("I-PER", "Doe", 0.9)]);
        assert_eq!(merged, vec![ResolvedEntity::new("PER", "JohnDoe", 0.9)]);
    }

    #[test]
    fn test_leading_space_fragments_are_trimmed() {
        let model = vec![
            at("B-PER", " John", 0.99, 10),
            at("I-PER", " Doe", 0.95, 15),
            at("O", " works", 0.99, 19),
        ];
        let merged = merge(vec![], model);
        assert_eq!(merged, vec![ResolvedEntity::new("PER", "John Doe", 0.95)]);
    }

    #[test]
    fn test_span_confidence_is_minimum() {
        let model = vec![
            c("B-ORG", "Acme", 0.8),
            c("I-ORG", " Widgets", 0.6),
            c("I-ORG", " Inc", 0.9),
        ];
        let merged = merge(vec![], model);
        assert_eq!(merged, vec![ResolvedEntity::new("ORG", "Acme Widgets Inc", 0.6)]);
    }

    #[test]
    fn test_mismatched_inside_tag_breaks_the_span() {
        let model = vec![
            c("B-PER", "John", 0.9),
            c("I-LOC", "Paris", 0.9),
            c("I-PER", "Doe", 0.9),
        ];
        let merged = merge(vec![], model);
        // The span closes at I-LOC; neither I- token starts a new one.
        assert_eq!(pairs(&merged), vec![("PER", "John")]);
    }

    #[test]
    fn test_inside_without_open_span_is_ignored() {
        let merged = merge(vec![], vec![c("I-PER", "Doe", 0.9), c("O", "said", 0.9)]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_begin_closes_previous_span() {
        let model = vec![c("B-PER", "Alice", 0.9), c("B-PER", "Bob", 0.8)];
        assert_eq!(pairs(&merge(vec![], model)), vec![("PER", "Alice"), ("PER", "Bob")]);
    }

    #[test]
    fn test_plain_tag_closes_span_and_passes_through() {
        let pattern = vec![at("EMAIL", "jd@x.io", 0.98, 20)];
        let model = vec![at("B-PER", "John", 0.9, 0), at("I-PER", " Doe", 0.9, 4)];
        let merged = merge(pattern, model);
        assert_eq!(pairs(&merged), vec![("PER", "John Doe"), ("EMAIL", "jd@x.io")]);
    }

    #[test]
    fn test_plain_tag_interrupts_bio_run() {
        let pattern = vec![at("DATE", "3/4/25", 0.7, 5)];
        let model = vec![at("B-PER", "John", 0.9, 0), at("I-PER", "ny", 0.9, 12)];
        let merged = merge(pattern, model);
        assert_eq!(pairs(&merged), vec![("PER", "John"), ("DATE", "3/4/25")]);
    }

    #[test]
    fn test_duplicates_collapse_with_min_confidence() {
        let pattern = vec![
            at("EMAIL", "a@b.com", 0.98, 0),
            at("email", "a@b.com", 0.7, 20),
            at("EMAIL", "A@B.COM", 0.98, 40),
        ];
        let merged = merge(pattern, vec![]);
        assert_eq!(
            merged,
            vec![
                ResolvedEntity::new("EMAIL", "a@b.com", 0.7),
                ResolvedEntity::new("EMAIL", "A@B.COM", 0.98),
            ]
        );
    }

    #[test]
    fn test_output_follows_source_position() {
        let pattern = vec![
            at("EMAIL", "ops@corp.io", 0.98, 30),
            at("IP_ADDRESS", "10.0.0.1", 0.92, 7),
        ];
        let merged = merge(pattern, vec![]);
        assert_eq!(pairs(&merged), vec![("IP_ADDRESS", "10.0.0.1"), ("EMAIL", "ops@corp.io")]);
    }

    #[test]
    fn test_unpositioned_candidates_keep_their_slot() {
        let model = vec![
            c("B-PER", "Zed", 0.9),
            at("B-LOC", "Rome", 0.9, 40),
            c("B-ORG", "Acme", 0.9),
            at("B-LOC", "Oslo", 0.9, 5),
        ];
        let merged = merge(vec![], model);
        assert_eq!(
            pairs(&merged),
            vec![("PER", "Zed"), ("LOC", "Oslo"), ("ORG", "Acme"), ("LOC", "Rome")]
        );
    }

    #[test]
    fn test_blank_entities_are_dropped() {
        let merged = merge(vec![c("PHONE", "   ", 0.95)], vec![c("B-PER", " ", 0.9)]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge(vec![], vec![]).is_empty());
    }
}
