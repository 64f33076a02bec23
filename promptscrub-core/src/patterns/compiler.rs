//! compiler.rs - Compiles and caches the pattern detector battery.
//!
//! Converts a `DetectorConfig` into `CompiledDetectors`: the built-in battery
//! in its fixed order, minus disabled categories, followed by any custom
//! detectors. A detector that fails to compile is logged and left out; it
//! never prevents the others from running. Results are cached process-wide,
//! keyed by a hash of the configuration.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{DetectorConfig, MAX_PATTERN_LENGTH};
use crate::errors::ScrubError;
use crate::patterns::builtin::{Validation, BUILTIN_PATTERNS};

/// A single compiled detector.
#[derive(Debug)]
pub struct CompiledDetector {
    /// Category reported for every match.
    pub category: String,
    pub regex: Regex,
    /// Fixed confidence attached to every match.
    pub confidence: f64,
    /// Check each raw match must pass.
    pub validation: Validation,
}

/// The detectors to run, in execution order.
#[derive(Debug, Default)]
pub struct CompiledDetectors {
    pub detectors: Vec<CompiledDetector>,
    /// Faults hit while compiling, kept for diagnostics.
    pub faults: Vec<String>,
}

static COMPILED_DETECTORS_CACHE: Lazy<RwLock<HashMap<u64, Arc<CompiledDetectors>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn hash_config(config: &DetectorConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    let mut disabled: Vec<String> = config.disabled.iter().map(|d| d.to_uppercase()).collect();
    disabled.sort();
    disabled.hash(&mut hasher);
    config.custom.hash(&mut hasher);
    hasher.finish()
}

fn build_regex(
    category: &str,
    pattern: &str,
    case_insensitive: bool,
) -> Result<Regex, ScrubError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(ScrubError::PatternLengthExceeded(
            category.to_string(),
            pattern.len(),
            MAX_PATTERN_LENGTH,
        ));
    }
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .size_limit(10 * (1 << 20))
        .build()
        .map_err(|source| ScrubError::DetectorFault {
            category: category.to_string(),
            source,
        })
}

/// Compiles the detector battery described by `config`. Never fails as a
/// whole: each broken detector is recorded in `faults` and skipped.
pub fn compile_detectors(config: &DetectorConfig) -> CompiledDetectors {
    let mut compiled = CompiledDetectors::default();

    let builtin = BUILTIN_PATTERNS
        .iter()
        .filter(|p| {
            let disabled = config.is_disabled(p.category);
            if disabled {
                debug!("Detector '{}' disabled by configuration.", p.category);
            }
            !disabled
        })
        .map(|p| (p.category.to_string(), p.pattern, p.case_insensitive, p.confidence, p.validation));

    let custom = config.custom.iter().map(|c| {
        (c.category.to_uppercase(), c.pattern.as_str(), c.case_insensitive, c.confidence, Validation::None)
    });

    for (category, pattern, case_insensitive, confidence, validation) in builtin.chain(custom) {
        match build_regex(&category, pattern, case_insensitive) {
            Ok(regex) => {
                log::debug!(
                    target: "promptscrub_core::patterns",
                    "Detector '{}' compiled successfully.",
                    &category
                );
                compiled.detectors.push(CompiledDetector {
                    category,
                    regex,
                    confidence: confidence.clamp(0.0, 1.0),
                    validation,
                });
            }
            Err(e) => {
                warn!("Skipping detector: {}", e);
                compiled.faults.push(e.to_string());
            }
        }
    }

    debug!(
        "Finished compiling detectors. Total compiled: {}, faults: {}.",
        compiled.detectors.len(),
        compiled.faults.len()
    );
    compiled
}

/// Returns the compiled battery for `config`, compiling it on first use.
pub fn get_or_compile_detectors(config: &DetectorConfig) -> Arc<CompiledDetectors> {
    let cache_key = hash_config(config);

    {
        let cache = COMPILED_DETECTORS_CACHE
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(detectors) = cache.get(&cache_key) {
            debug!("Serving compiled detectors from cache for key: {}", cache_key);
            return Arc::clone(detectors);
        }
    }

    let compiled = Arc::new(compile_detectors(config));
    COMPILED_DETECTORS_CACHE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(cache_key, Arc::clone(&compiled));

    debug!("Compiled and cached detectors for key: {}", cache_key);
    compiled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomPattern;

    fn categories(compiled: &CompiledDetectors) -> Vec<&str> {
        compiled.detectors.iter().map(|d| d.category.as_str()).collect()
    }

    #[test]
    fn test_builtin_battery_compiles_in_order() {
        let compiled = compile_detectors(&DetectorConfig::default());
        assert!(compiled.faults.is_empty(), "faults: {:?}", compiled.faults);
        assert_eq!(
            categories(&compiled),
            vec!["PHONE", "EMAIL", "IP_ADDRESS", "URL", "CREDIT_CARD", "SSN", "ADDRESS", "DATE"]
        );
    }

    #[test]
    fn test_disabled_categories_are_skipped() {
        let config = DetectorConfig {
            disabled: vec!["date".to_string(), "URL".to_string()],
            custom: vec![],
        };
        let compiled = compile_detectors(&config);
        assert!(!categories(&compiled).contains(&"DATE"));
        assert!(!categories(&compiled).contains(&"URL"));
        assert_eq!(compiled.detectors.len(), 6);
    }

    #[test]
    fn test_broken_custom_detector_is_isolated() {
        let config = DetectorConfig {
            disabled: vec![],
            custom: vec![
                CustomPattern {
                    category: "broken".to_string(),
                    pattern: "([a-z".to_string(),
                    ..CustomPattern::default()
                },
                CustomPattern {
                    category: "employee_id".to_string(),
                    pattern: r"EMP-\d{6}".to_string(),
                    confidence: 0.9,
                    ..CustomPattern::default()
                },
            ],
        };
        let compiled = compile_detectors(&config);
        assert_eq!(compiled.faults.len(), 1);
        assert!(compiled.faults[0].contains("BROKEN"));
        assert_eq!(categories(&compiled).last(), Some(&"EMPLOYEE_ID"));
    }

    #[test]
    fn test_overlong_custom_pattern_is_a_fault() {
        let config = DetectorConfig {
            disabled: vec![],
            custom: vec![CustomPattern {
                category: "long".to_string(),
                pattern: "a".repeat(MAX_PATTERN_LENGTH + 1),
                ..CustomPattern::default()
            }],
        };
        let compiled = compile_detectors(&config);
        assert_eq!(compiled.faults.len(), 1);
        assert!(compiled.faults[0].contains("exceeds maximum"));
    }

    #[test]
    fn test_cache_returns_shared_instance() {
        let config = DetectorConfig {
            disabled: vec!["SSN".to_string()],
            custom: vec![],
        };
        let first = get_or_compile_detectors(&config);
        let second = get_or_compile_detectors(&config);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
