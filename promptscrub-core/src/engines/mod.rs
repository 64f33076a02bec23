// promptscrub-core/src/engines/mod.rs
//! Detection engines.
//!
//! `pattern_engine` runs the deterministic detector battery. `model_handle`
//! owns the lifecycle of the token-classification model, `model_engine` calls
//! it with bounded patience, and `http_classifier` talks to a remote
//! inference endpoint.

pub mod http_classifier;
pub mod model_engine;
pub mod model_handle;
pub mod pattern_engine;
