//! Error types for the pipeline
//!
//! Deliberately small: a verification run never fails outward. Transport
//! failures are retried and then degraded per call site, parse problems
//! resolve to best-effort defaults, and the orchestrator's entry points
//! always return a result. What remains is caller error, caught before a
//! run starts.

use thiserror::Error;

/// Errors raised before a verification run begins
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration (for example, chunk size not exceeding overlap)
    #[error("configuration error: {0}")]
    Config(String),
}
