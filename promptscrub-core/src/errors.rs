//! errors.rs - Custom error types for the promptscrub-core library.
//!
//! Most of these never reach a caller of the pipeline: detector faults and
//! model unavailability are absorbed and logged, and the pipeline degrades to
//! whatever detection is still possible. They surface from the lower-level
//! building blocks (pattern compilation, the model handle, the HTTP classifier,
//! configuration loading) so those can be tested and reported precisely.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// All error types produced by the `promptscrub-core` library.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrubError {
    /// A single pattern detector could not be built. The detector is skipped;
    /// the rest of the battery still runs.
    #[error("Detector '{category}' failed to compile: {source}")]
    DetectorFault {
        category: String,
        #[source]
        source: regex::Error,
    },

    #[error("Detector '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    /// The token-classification engine could not be loaded or did not answer.
    #[error("Classification model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Classifier request failed: {0}")]
    ClassifierRequest(#[from] reqwest::Error),

    #[error("Classifier returned an unusable response: {0}")]
    ClassifierResponse(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
