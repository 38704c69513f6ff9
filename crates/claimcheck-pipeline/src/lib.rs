//! Claimcheck Pipeline
//!
//! Two-stage document fact-verification: stage 1 asks the model to list
//! the checkable claims in a document, stage 2 verifies each claim
//! independently against the same model under a fixed-width concurrency
//! gate, and the results are reassembled into one combined markdown
//! report in original claim order.
//!
//! # Architecture
//!
//! ```text
//! fragments → assemble → extraction prompt → gateway → claim list
//!                 → [verification prompt → gateway → block] × N (≤5 in flight)
//!                 → combined report (claim order)
//! ```
//!
//! # Guarantees
//!
//! - Exactly one [`AnalysisResult`] per run, on every success and failure
//!   path; `analyze` never returns an error
//! - One claim's failed verification never fails the run or any other
//!   claim
//! - At most `max_concurrency` verification calls in flight per run
//!
//! # Example
//!
//! ```
//! use claimcheck_pipeline::{PipelineConfig, Verifier};
//! use claimcheck_inference::MockProvider;
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new("Title: none\nClaims:\n- The sky is blue");
//! let verifier = Verifier::new(provider, PipelineConfig::default());
//!
//! let result = verifier.analyze(&["The sky is blue."]).await;
//! assert!(result.analysis_markdown.is_some());
//! # });
//! ```

#![warn(missing_docs)]

mod chunks;
mod config;
mod error;
mod orchestrator;
mod parser;
mod prompt;


pub use chunks::{assemble_document, chunk_text, CHUNK_SEPARATOR};
pub use claimcheck_domain::AnalysisResult;
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use orchestrator::Verifier;
pub use parser::{parse_extraction, parse_single_shot, ExtractionOutcome, SingleShotOutcome};
pub use prompt::{extraction_prompt, single_shot_prompt, verification_prompt};
