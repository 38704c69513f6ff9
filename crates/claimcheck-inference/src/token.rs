//! Credential caching for remote providers
//!
//! The access token used by the inference gateway is read-mostly: it is
//! fetched once, shared across every concurrent verification call, and
//! refreshed lazily when it nears expiry. The cache is an explicitly
//! owned provider object guarded by a single mutex, not global state.

use crate::InferenceError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Refresh this long before the reported expiry to avoid using a token
/// that expires mid-request.
const EXPIRY_LEEWAY: Duration = Duration::from_secs(30);

/// A bearer token with an optional expiry deadline
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The bearer token value
    pub token: String,

    /// When the token stops being usable; `None` means it never expires
    pub expires_at: Option<Instant>,
}

impl AccessToken {
    fn is_valid(&self) -> bool {
        match self.expires_at {
            Some(deadline) => Instant::now() + EXPIRY_LEEWAY < deadline,
            None => true,
        }
    }
}

/// Capability to produce the current bearer token for a request
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a token valid for an immediate request
    async fn current_token(&self) -> Result<String, InferenceError>;
}

/// Source of fresh tokens, called only on cache miss or expiry
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch a fresh token from the underlying credential system
    async fn fetch(&self) -> Result<AccessToken, InferenceError>;
}

/// Caching token provider with lazy refresh-on-expiry
///
/// Concurrent callers serialize on one mutex only long enough to check
/// validity or install a refreshed token; a valid cached token is handed
/// out without touching the source.
pub struct CachedTokenProvider<S> {
    source: S,
    cached: Mutex<Option<AccessToken>>,
}

impl<S: TokenSource> CachedTokenProvider<S> {
    /// Create a provider caching tokens from the given source
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<S: TokenSource> TokenProvider for CachedTokenProvider<S> {
    async fn current_token(&self) -> Result<String, InferenceError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_valid() {
                return Ok(token.token.clone());
            }
            debug!("cached token expired, refreshing");
        }
        let fresh = self.source.fetch().await?;
        let value = fresh.token.clone();
        *cached = Some(fresh);
        Ok(value)
    }
}

/// Fixed token, for tests and pre-issued credentials
pub struct StaticToken(String);

impl StaticToken {
    /// Wrap a pre-issued token value
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn current_token(&self) -> Result<String, InferenceError> {
        Ok(self.0.clone())
    }
}

/// Default GCE metadata server token endpoint
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Token source backed by the GCE metadata server
///
/// Works anywhere application-default credentials are provided by the
/// environment (GCE, Cloud Run, GKE workload identity).
pub struct MetadataServerSource {
    client: reqwest::Client,
    endpoint: String,
}

impl MetadataServerSource {
    /// Create a source against the standard metadata endpoint
    pub fn new() -> Result<Self, InferenceError> {
        Self::with_endpoint(METADATA_TOKEN_URL)
    }

    /// Create a source against a custom endpoint (for local emulators)
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| InferenceError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl TokenSource for MetadataServerSource {
    async fn fetch(&self) -> Result<AccessToken, InferenceError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| InferenceError::Transport(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(InferenceError::Transport(format!(
                "token request returned HTTP {}",
                response.status()
            )));
        }

        let body: MetadataTokenResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Transport(format!("invalid token response: {e}")))?;

        Ok(AccessToken {
            token: body.access_token,
            expires_at: Some(Instant::now() + Duration::from_secs(body.expires_in)),
        })
    }
}
