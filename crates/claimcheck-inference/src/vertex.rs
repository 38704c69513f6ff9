//! Vertex-style remote inference provider
//!
//! Sends one prompt per call to a versioned `generateContent` model
//! endpoint over authenticated HTTPS and returns the first candidate's
//! non-empty text. Retry policy is applied by the caller; this provider
//! reports each failure exactly once.

use crate::token::TokenProvider;
use crate::InferenceError;
use async_trait::async_trait;
use claimcheck_domain::InferenceProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Default model location
pub const DEFAULT_LOCATION: &str = "us-central1";

/// Default model name
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Generation requests can run long; match the upstream 90s budget
const REQUEST_TIMEOUT_SECS: u64 = 90;

/// Endpoint configuration for a Vertex-style model
#[derive(Debug, Clone)]
pub struct VertexConfig {
    /// GCP project id owning the model endpoint
    pub project_id: String,

    /// Model location (region)
    pub location: String,

    /// Published model name
    pub model: String,
}

impl VertexConfig {
    /// Configuration for the default model in the default location
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: DEFAULT_LOCATION.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the model location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Override the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "https://{loc}-aiplatform.googleapis.com/v1beta1/projects/{proj}/locations/{loc}/publishers/google/models/{model}:generateContent",
            loc = self.location,
            proj = self.project_id,
            model = self.model,
        )
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: GoogleSearch,
}

// Serializes as `{}`; presence of the key enables search grounding
#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Remote inference provider for a Vertex-style model endpoint
pub struct VertexProvider<T> {
    config: VertexConfig,
    client: reqwest::Client,
    tokens: T,
}

impl<T: TokenProvider> VertexProvider<T> {
    /// Create a provider for the configured endpoint.
    ///
    /// Fails if the project id is missing or the HTTP client cannot be
    /// built.
    pub fn new(config: VertexConfig, tokens: T) -> Result<Self, InferenceError> {
        if config.project_id.trim().is_empty() {
            return Err(InferenceError::Config(
                "project id is not configured".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| InferenceError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            client,
            tokens,
        })
    }

    async fn send(&self, prompt: &str) -> Result<String, InferenceError> {
        let token = self.tokens.current_token().await?;
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig::default(),
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        };

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            error!(status = %status, "inference request failed");
            return Err(InferenceError::Transport(format!("HTTP {status}: {detail}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Transport(format!("invalid response body: {e}")))?;

        if parsed.candidates.is_empty() {
            return Err(InferenceError::EmptyResponse(
                "no candidates returned".to_string(),
            ));
        }
        for candidate in parsed.candidates {
            for part in candidate.content.parts {
                if let Some(text) = part.text {
                    let text = text.trim();
                    if !text.is_empty() {
                        return Ok(text.to_string());
                    }
                }
            }
        }
        Err(InferenceError::EmptyResponse(
            "every candidate part was empty".to_string(),
        ))
    }
}

#[async_trait]
impl<T: TokenProvider> InferenceProvider for VertexProvider<T> {
    type Error = InferenceError;

    async fn generate(&self, prompt: &str, stage: &str) -> Result<String, Self::Error> {
        debug!(stage, prompt_len = prompt.len(), "sending inference request");
        self.send(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::StaticToken;

    #[test]
    fn test_endpoint_url_shape() {
        let config = VertexConfig::new("my-project");
        let url = config.endpoint();
        assert_eq!(
            url,
            "https://us-central1-aiplatform.googleapis.com/v1beta1/projects/my-project/locations/us-central1/publishers/google/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_config_overrides() {
        let config = VertexConfig::new("p")
            .with_location("europe-west4")
            .with_model("gemini-2.0-flash");
        assert!(config.endpoint().contains("europe-west4-aiplatform"));
        assert!(config.endpoint().contains("gemini-2.0-flash:generateContent"));
    }

    #[test]
    fn test_missing_project_id_rejected() {
        let result = VertexProvider::new(VertexConfig::new("  "), StaticToken::new("t"));
        assert!(matches!(result, Err(InferenceError::Config(_))));
    }

    #[test]
    fn test_request_payload_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: "hello" }],
            }],
            generation_config: GenerationConfig::default(),
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(json["generationConfig"]["topK"], 40);
        assert!(json["tools"][0]["googleSearch"].is_object());
    }

    #[test]
    fn test_response_deserializes_with_missing_fields() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());

        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "answer"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(
            parsed.candidates[0].content.parts[0].text.as_deref(),
            Some("answer")
        );
    }
}
