//! Claimcheck Inference Provider Layer
//!
//! Pluggable implementations of the `InferenceProvider` trait from
//! `claimcheck-domain`, plus the retry combinator and credential caching
//! shared by all remote providers.
//!
//! # Providers
//!
//! - `MockProvider`: deterministic, instrumented mock for testing
//! - `VertexProvider`: authenticated HTTPS calls to a versioned
//!   Vertex-style `generateContent` model endpoint
//!
//! # Examples
//!
//! ```
//! use claimcheck_inference::MockProvider;
//! use claimcheck_domain::InferenceProvider;
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new("Hello from the model");
//! let answer = provider.generate("test prompt", "test stage").await.unwrap();
//! assert_eq!(answer, "Hello from the model");
//! # });
//! ```

#![warn(missing_docs)]

pub mod retry;
pub mod token;
pub mod vertex;

use async_trait::async_trait;
use claimcheck_domain::InferenceProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use retry::{retry_with_backoff, RetryPolicy};
pub use token::{AccessToken, CachedTokenProvider, StaticToken, TokenProvider, TokenSource};
pub use vertex::{VertexConfig, VertexProvider};

/// Errors that can occur during inference operations
#[derive(Error, Debug)]
pub enum InferenceError {
    /// The service was unreachable or returned a non-success status
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered but produced no usable text
    #[error("empty response: {0}")]
    EmptyResponse(String),

    /// The provider is not configured correctly
    #[error("configuration error: {0}")]
    Config(String),
}

impl InferenceError {
    /// Whether retrying this failure could plausibly succeed.
    ///
    /// Transport and empty-response failures are transient; configuration
    /// errors are not.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, InferenceError::Config(_))
    }
}

/// Deterministic mock provider for testing
///
/// Responses are keyed by prompt substring, so callers can target the
/// extraction prompt and each per-claim verification prompt independently
/// without reproducing full prompt text. The mock also tracks total call
/// count and peak simultaneous in-flight calls, which the pipeline tests
/// use to check the concurrency gate.
///
/// # Examples
///
/// ```
/// use claimcheck_inference::MockProvider;
/// use claimcheck_domain::InferenceProvider;
///
/// # tokio_test::block_on(async {
/// let provider = MockProvider::new("default answer")
///     .respond_with("weather", "Status: green");
/// assert_eq!(provider.generate("what is the weather", "s").await.unwrap(), "Status: green");
/// assert_eq!(provider.generate("unrelated", "s").await.unwrap(), "default answer");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, String)>>>,
    failing: Arc<Mutex<Vec<String>>>,
    delays: Arc<Mutex<Vec<(String, Duration)>>>,
    call_count: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a mock that answers every prompt with the same response
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(Vec::new())),
            delays: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answer prompts containing `key` with `response`.
    ///
    /// Keys are checked in insertion order; the first match wins.
    pub fn respond_with(self, key: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push((key.into(), response.into()));
        self
    }

    /// Fail every prompt containing `key` with a transport error
    pub fn fail_for(self, key: impl Into<String>) -> Self {
        self.failing.lock().unwrap().push(key.into());
        self
    }

    /// Delay the answer for prompts containing `key`
    pub fn delay_for(self, key: impl Into<String>, delay: Duration) -> Self {
        self.delays.lock().unwrap().push((key.into(), delay));
        self
    }

    /// Total number of generate calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously in-flight calls observed
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lookup_delay(&self, prompt: &str) -> Option<Duration> {
        self.delays
            .lock()
            .unwrap()
            .iter()
            .find(|(key, _)| prompt.contains(key.as_str()))
            .map(|(_, delay)| *delay)
    }

    fn lookup_response(&self, prompt: &str, stage: &str) -> Result<String, InferenceError> {
        if let Some(key) = self
            .failing
            .lock()
            .unwrap()
            .iter()
            .find(|key| prompt.contains(key.as_str()))
        {
            return Err(InferenceError::Transport(format!(
                "mock failure for '{key}' during {stage}"
            )));
        }
        let responses = self.responses.lock().unwrap();
        let answer = responses
            .iter()
            .find(|(key, _)| prompt.contains(key.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.default_response.clone());
        Ok(answer)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl InferenceProvider for MockProvider {
    type Error = InferenceError;

    async fn generate(&self, prompt: &str, stage: &str) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.lookup_delay(prompt) {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.lookup_response(prompt, stage);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_response() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt", "stage").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_substring_responses() {
        let provider = MockProvider::default()
            .respond_with("hello", "world")
            .respond_with("foo", "bar");

        assert_eq!(provider.generate("say hello", "s").await.unwrap(), "world");
        assert_eq!(provider.generate("foo fighters", "s").await.unwrap(), "bar");
        assert_eq!(
            provider.generate("unknown", "s").await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_first_match_wins() {
        let provider = MockProvider::default()
            .respond_with("claim", "first")
            .respond_with("claim extraction", "second");

        assert_eq!(
            provider.generate("claim extraction", "s").await.unwrap(),
            "first"
        );
    }

    #[tokio::test]
    async fn test_mock_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("a", "s").await.unwrap();
        provider.generate("b", "s").await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_scripted_failure() {
        let provider = MockProvider::default().fail_for("bad prompt");

        let result = provider.generate("a bad prompt here", "s").await;
        assert!(matches!(result, Err(InferenceError::Transport(_))));

        // Other prompts are unaffected
        assert!(provider.generate("good prompt", "s").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_tracks_peak_in_flight() {
        let provider = MockProvider::new("ok").delay_for("slow", Duration::from_millis(50));

        let a = provider.clone();
        let b = provider.clone();
        let first = tokio::spawn(async move { a.generate("slow one", "s").await });
        let second = tokio::spawn(async move { b.generate("slow two", "s").await });
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        assert_eq!(provider.peak_in_flight(), 2);
    }

    #[test]
    fn test_config_error_not_retryable() {
        assert!(!InferenceError::Config("missing project".into()).is_retryable());
        assert!(InferenceError::Transport("503".into()).is_retryable());
        assert!(InferenceError::EmptyResponse("no candidates".into()).is_retryable());
    }
}
