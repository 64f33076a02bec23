//! Configuration management for `promptscrub-core`.
//!
//! This module defines the configuration that drives a scrub run: placeholder
//! overrides, the confidence floor, category exclusions, which pattern
//! detectors are active (plus user-defined ones), and how to reach the
//! token-classification model. It handles YAML (de)serialization and provides
//! utilities for loading, merging, and validating configs.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::ScrubError;
use crate::placeholders::PlaceholderMap;

/// Maximum allowed length for a custom detector pattern.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Entities below this confidence are left in place unless configured otherwise.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// Category that is never substituted, whatever its score.
pub const ALWAYS_EXCLUDED_CATEGORY: &str = "SEX";

/// A user-defined pattern detector, run after the built-in battery.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CustomPattern {
    /// Category the matches are reported under (e.g. "EMPLOYEE_ID").
    pub category: String,
    /// The regex pattern string.
    pub pattern: String,
    /// Fixed confidence attached to every match.
    pub confidence: f64,
    /// If true, the pattern ignores case.
    pub case_insensitive: bool,
}

impl Default for CustomPattern {
    fn default() -> Self {
        Self {
            category: String::new(),
            pattern: String::new(),
            confidence: 0.8,
            case_insensitive: false,
        }
    }
}

impl Hash for CustomPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.category.hash(state);
        self.pattern.hash(state);
        self.confidence.to_bits().hash(state);
        self.case_insensitive.hash(state);
    }
}

/// Which pattern detectors run.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize, Hash)]
#[serde(default)]
pub struct DetectorConfig {
    /// Built-in categories to skip (case-insensitive, e.g. "DATE").
    pub disabled: Vec<String>,
    /// Additional detectors.
    pub custom: Vec<CustomPattern>,
}

impl DetectorConfig {
    pub fn is_disabled(&self, category: &str) -> bool {
        self.disabled.iter().any(|d| d.eq_ignore_ascii_case(category))
    }
}

/// How to reach the token-classification model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Master switch. With no endpoint the model is skipped even when enabled.
    pub enabled: bool,
    /// Token-classification inference endpoint.
    pub endpoint: Option<String>,
    /// Bearer token for the endpoint.
    pub api_token: Option<String>,
    /// Patience for a single classification call, in milliseconds.
    pub timeout_ms: u64,
    /// Patience for loading the model, in milliseconds.
    pub load_timeout_ms: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            api_token: None,
            timeout_ms: 5_000,
            load_timeout_ms: 30_000,
        }
    }
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    /// The endpoint to use, if the model should be used at all.
    pub fn active_endpoint(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.endpoint.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

/// Top-level configuration for a scrub run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrubConfig {
    /// Placeholder overrides, layered over the built-in defaults.
    pub placeholders: PlaceholderMap,
    /// Entities scoring below this are not substituted.
    pub min_confidence: f64,
    /// Categories never substituted. `SEX` is excluded even if absent here.
    pub excluded_categories: Vec<String>,
    pub detectors: DetectorConfig,
    pub model: ModelConfig,
    /// Clean editor markup and surrounding whitespace from the prompt first.
    pub normalize_input: bool,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            placeholders: PlaceholderMap::default(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            excluded_categories: vec![ALWAYS_EXCLUDED_CATEGORY.to_string()],
            detectors: DetectorConfig::default(),
            model: ModelConfig::default(),
            normalize_input: false,
        }
    }
}

impl ScrubConfig {
    /// Loads a configuration from a YAML file and validates it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ScrubConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        info!(
            "Loaded configuration from {} ({} placeholder override(s), {} custom detector(s)).",
            path.display(),
            config.placeholders.overrides().len(),
            config.detectors.custom.len()
        );
        Ok(config)
    }

    /// Loads the built-in configuration embedded in the library.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default configuration from embedded string...");
        let default_yaml = include_str!("../config/default_config.yaml");
        let config: ScrubConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default configuration")?;
        Ok(config)
    }

    /// Checks every field a user can get wrong, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&self.min_confidence) {
            errors.push(format!(
                "`min_confidence` must lie in [0, 1], got {}.",
                self.min_confidence
            ));
        }

        let mut seen = HashSet::new();
        for custom in &self.detectors.custom {
            if custom.category.trim().is_empty() {
                errors.push("A custom detector has an empty `category` field.".to_string());
            } else if !seen.insert((custom.category.to_uppercase(), custom.pattern.clone())) {
                errors.push(format!(
                    "Duplicate custom detector for category '{}'.",
                    custom.category
                ));
            }

            if custom.pattern.is_empty() {
                errors.push(format!(
                    "Custom detector '{}' has an empty `pattern` field.",
                    custom.category
                ));
                continue;
            }

            if custom.pattern.len() > MAX_PATTERN_LENGTH {
                errors.push(format!(
                    "Custom detector '{}': pattern length ({}) exceeds maximum allowed ({}).",
                    custom.category,
                    custom.pattern.len(),
                    MAX_PATTERN_LENGTH
                ));
                continue;
            }

            if let Err(e) = Regex::new(&custom.pattern) {
                errors.push(format!(
                    "Custom detector '{}' has an invalid regex pattern: {}",
                    custom.category, e
                ));
            }

            if !(0.0..=1.0).contains(&custom.confidence) {
                errors.push(format!(
                    "Custom detector '{}': confidence must lie in [0, 1], got {}.",
                    custom.category, custom.confidence
                ));
            }
        }

        if self.model.timeout_ms == 0 {
            errors.push("`model.timeout_ms` must be greater than 0.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ScrubError::Configuration(format!("validation failed:\n{}", errors.join("\n"))).into())
        }
    }
}

/// Merges a user configuration over the defaults.
///
/// Placeholder overrides, exclusions, disabled detectors and custom detectors
/// accumulate; scalar settings and the model section come from the user.
pub fn merge_config(default_config: ScrubConfig, user_config: Option<ScrubConfig>) -> ScrubConfig {
    let Some(user) = user_config else {
        debug!("No user configuration provided; using defaults.");
        return default_config;
    };

    debug!(
        "Merging user configuration: {} placeholder override(s), {} custom detector(s).",
        user.placeholders.overrides().len(),
        user.detectors.custom.len()
    );

    let mut placeholders = default_config.placeholders;
    placeholders.extend(&user.placeholders);

    let mut excluded_categories = default_config.excluded_categories;
    for category in user.excluded_categories {
        if !excluded_categories.iter().any(|c| c.eq_ignore_ascii_case(&category)) {
            excluded_categories.push(category);
        }
    }

    let mut disabled = default_config.detectors.disabled;
    for category in user.detectors.disabled {
        if !disabled.iter().any(|c| c.eq_ignore_ascii_case(&category)) {
            disabled.push(category);
        }
    }

    let mut custom = default_config.detectors.custom;
    for pattern in user.detectors.custom {
        if let Some(existing) = custom.iter_mut().find(|c| {
            c.category.eq_ignore_ascii_case(&pattern.category) && c.pattern == pattern.pattern
        }) {
            debug!("User custom detector '{}' replaces a default one.", pattern.category);
            *existing = pattern;
        } else {
            custom.push(pattern);
        }
    }

    ScrubConfig {
        placeholders,
        min_confidence: user.min_confidence,
        excluded_categories,
        detectors: DetectorConfig { disabled, custom },
        model: user.model,
        normalize_input: user.normalize_input || default_config.normalize_input,
    }
}

/// Locations searched, in order, for a configuration file when none is given.
pub fn config_candidate_paths() -> Vec<PathBuf> {
    let candidates = vec![
        dirs::home_dir().map(|p| p.join(".promptscrub").join("config.yaml")),
        dirs::config_dir().map(|p| p.join("promptscrub").join("config.yaml")),
        Some(PathBuf::from("./promptscrub.yaml")),
    ];
    candidates.into_iter().flatten().collect()
}

/// Resolves the configuration for a run: the defaults merged with either the
/// explicitly requested file or the first candidate file that exists.
pub fn load_effective_config(explicit: Option<&Path>) -> Result<ScrubConfig> {
    let defaults = ScrubConfig::load_default()?;

    let user = match explicit {
        Some(path) => Some(ScrubConfig::load_from_file(path)?),
        None => match config_candidate_paths().into_iter().find(|p| p.is_file()) {
            Some(found) => {
                debug!("Found configuration file at {}", found.display());
                Some(ScrubConfig::load_from_file(&found)?)
            }
            None => {
                debug!("No configuration file found in the usual locations.");
                None
            }
        },
    };

    let merged = merge_config(defaults, user);
    if merged.model.enabled && merged.model.active_endpoint().is_none() {
        debug!("Model enabled but no endpoint configured; detection will be pattern-only.");
    }
    if merged.min_confidence > 0.95 {
        warn!(
            "min_confidence {} is above every built-in detector's score; only model entities can qualify.",
            merged.min_confidence
        );
    }
    Ok(merged)
}
