// promptscrub-core/src/lib.rs
//! # PromptScrub Core Library
//!
//! `promptscrub-core` finds personally identifiable information in free text
//! (typically a prompt about to be sent to a language model) and replaces it
//! with placeholders.
//!
//! Detection is layered. A deterministic battery of pattern detectors (phone,
//! email, IP address, URL, credit card, SSN, street address, date) always
//! runs. A token-classification model, when one is configured, runs beside it
//! and contributes names, organizations, locations and similar entities. The
//! two candidate streams are merged into whole, deduplicated entities and
//! substituted longest first.
//!
//! ## Modules
//!
//! * `config`: `ScrubConfig`, its YAML loading, merging and validation.
//! * `entity`: candidate and resolved entity records, and PII-safe logging helpers.
//! * `placeholders`: category to placeholder mapping with built-in defaults.
//! * `patterns`: the built-in detector battery and its compilation.
//! * `validators`: programmatic checks applied to raw pattern matches.
//! * `engine`: the `TokenClassifier` and `ModelLoader` traits.
//! * `engines`: pattern detection, model lifecycle, model adapter, HTTP classifier.
//! * `merger`: BIO span reconstruction and deduplication.
//! * `redactor`: policy filtering and substitution.
//! * `normalize`: clean-up of editor markup in captured prompts.
//! * `pipeline`: the `Scrubber` entry points.
//! * `headless`: one-shot convenience wrapper.
//!
//! ## Usage Example
//!
//! ```rust
//! use promptscrub_core::{PlaceholderMap, ScrubConfig, Scrubber};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let config = ScrubConfig::load_default()?;
//! let scrubber = Scrubber::pattern_only(config);
//!
//! let redacted = scrubber
//!     .redact_text("Email: A@B.COM", &PlaceholderMap::defaults())
//!     .await;
//! assert_eq!(redacted, "Email: [email@gmail.com]");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Degraded conditions never reach the caller of the pipeline: a detector that
//! fails to compile is skipped, and a model that cannot load or answer simply
//! contributes nothing. Both are logged. Fallible setup (configuration loading
//! and validation) returns `anyhow::Result`, with [`ScrubError`] underneath.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod entity;
pub mod errors;
pub mod headless;
pub mod merger;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod placeholders;
pub mod redactor;
pub mod validators;

/// Re-exports the configuration types and loading helpers.
pub use config::{
    config_candidate_paths,
    load_effective_config,
    merge_config,
    CustomPattern,
    DetectorConfig,
    ModelConfig,
    ScrubConfig,
    DEFAULT_MIN_CONFIDENCE,
    MAX_PATTERN_LENGTH,
};

pub use errors::ScrubError;

pub use entity::{redact_sensitive, CandidateEntity, ResolvedEntity, TagKind};

pub use placeholders::PlaceholderMap;

/// Re-exports the model seam and its implementations.
pub use engine::{ModelLoader, StaticModelLoader, TokenClassifier};
pub use engines::http_classifier::{HttpModelLoader, HttpTokenClassifier};
pub use engines::model_engine::{Classification, ModelAdapter};
pub use engines::model_handle::{ModelHandle, ModelState};
pub use engines::pattern_engine::PatternDetector;

pub use merger::merge;
pub use normalize::normalize_prompt;
pub use redactor::{redact, redact_with_policy, RedactionPolicy};

/// Re-exports the pipeline entry points.
pub use pipeline::{RedactionReport, Scrubber};
pub use headless::headless_redact_string;

pub use patterns::compiler::{compile_detectors, get_or_compile_detectors, CompiledDetector, CompiledDetectors};
