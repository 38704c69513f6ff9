//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Infrastructure implementations live in other crates.

use async_trait::async_trait;

/// Trait for remote text-inference operations
///
/// Implemented by the infrastructure layer (claimcheck-inference). One
/// call is one logical inference operation; retry policy is applied by
/// the caller, not the provider.
#[async_trait]
pub trait InferenceProvider {
    /// Error type for inference operations
    type Error: std::fmt::Display + Send + 'static;

    /// Send one prompt and return the raw textual answer.
    ///
    /// `stage` is a short free-text label for observability (for example
    /// "claim extraction" or "verification 3/7"); it never affects
    /// control flow.
    async fn generate(&self, prompt: &str, stage: &str) -> Result<String, Self::Error>;
}
