// promptscrub-core/src/engines/pattern_engine.rs
//! The deterministic half of detection: runs the compiled pattern battery
//! over raw text and reports every match as a [`CandidateEntity`].
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use crate::config::DetectorConfig;
use crate::entity::{log_candidate_debug, CandidateEntity};
use crate::patterns::compiler::{get_or_compile_detectors, CompiledDetectors};
use crate::validators;

/// Maps byte offsets (what `regex` reports) to character offsets (what the
/// model reports), so candidates from both sources sort on the same scale.
#[derive(Debug)]
struct CharIndexMapper {
    /// `None` when the text is ASCII and both scales coincide.
    map: Option<Vec<usize>>,
}

impl CharIndexMapper {
    fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self { map: None };
        }
        let mut map = vec![0usize; text.len() + 1];
        let mut char_index = 0usize;
        for (byte_index, ch) in text.char_indices() {
            for slot in &mut map[byte_index..byte_index + ch.len_utf8()] {
                *slot = char_index;
            }
            char_index += 1;
        }
        map[text.len()] = char_index;
        Self { map: Some(map) }
    }

    fn to_char(&self, byte_index: usize) -> usize {
        match &self.map {
            None => byte_index,
            Some(map) => map[byte_index.min(map.len().saturating_sub(1))],
        }
    }
}

/// Runs the detector battery. Pure and total: any input yields a (possibly
/// empty) list of candidates.
#[derive(Debug, Clone)]
pub struct PatternDetector {
    compiled: Arc<CompiledDetectors>,
}

impl PatternDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            compiled: get_or_compile_detectors(config),
        }
    }

    /// The full built-in battery with nothing disabled.
    pub fn builtin() -> Self {
        Self::new(&DetectorConfig::default())
    }

    /// Every match of every detector, in detector order, each detector's
    /// matches left to right. Detectors may overlap one another.
    pub fn detect(&self, text: &str) -> Vec<CandidateEntity> {
        let mapper = CharIndexMapper::new(text);
        let mut candidates = Vec::new();

        for detector in &self.compiled.detectors {
            for m in detector.regex.find_iter(text) {
                if m.as_str().is_empty() {
                    continue;
                }
                if !validators::passes(detector.validation, text, m.start(), m.end()) {
                    log::debug!(
                        "Detector '{}' match at {}..{} rejected by validation.",
                        detector.category,
                        m.start(),
                        m.end()
                    );
                    continue;
                }
                let candidate = CandidateEntity::new(&detector.category, m.as_str(), detector.confidence)
                    .with_span(mapper.to_char(m.start()), mapper.to_char(m.end()));
                log_candidate_debug(module_path!(), "pattern", &candidate);
                candidates.push(candidate);
            }
        }

        log::debug!("Pattern detection produced {} candidate(s).", candidates.len());
        candidates
    }
}
