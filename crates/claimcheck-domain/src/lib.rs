//! Claimcheck Domain Layer
//!
//! Core value types and trait seams for the document fact-verification
//! pipeline. This crate defines the vocabulary every other layer speaks:
//! claims, verdicts, citations, and the final analysis result handed back
//! to the caller.
//!
//! ## Key Concepts
//!
//! - **ClaimStatement**: one checkable assertion pulled out of a document,
//!   together with its 1-based position among the extracted claims
//! - **Claim**: a structured verdict record (status, explanation, citations)
//! - **AnalysisResult**: the single, always-produced output of a
//!   verification run
//!
//! ## Architecture
//!
//! - Value types only, plus the `InferenceProvider` trait boundary
//! - Infrastructure implementations (remote providers, mocks) live in
//!   `claimcheck-inference`
//! - Orchestration lives in `claimcheck-pipeline`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod result;
pub mod traits;

// Re-exports for convenience
pub use claim::{Citation, Claim, ClaimStatement, ClaimStatus};
pub use result::AnalysisResult;
pub use traits::InferenceProvider;
