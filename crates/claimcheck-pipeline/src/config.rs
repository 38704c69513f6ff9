//! Configuration for the verification pipeline

use crate::error::PipelineError;
use claimcheck_inference::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a verification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum verification calls in flight simultaneously
    pub max_concurrency: usize,

    /// Total attempts per inference call, including the first
    pub retry_attempts: u32,

    /// Backoff after the first failed attempt (seconds); doubles per retry
    pub backoff_base_secs: u64,

    /// Upper bound on any single backoff delay (seconds)
    pub backoff_cap_secs: u64,

    /// Sliding-window chunk size (characters)
    pub chunk_size: usize,

    /// Overlap between consecutive chunks (characters)
    pub chunk_overlap: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            retry_attempts: 3,
            backoff_base_secs: 2,
            backoff_cap_secs: 10,
            chunk_size: 1500,
            chunk_overlap: 200,
        }
    }
}

impl PipelineConfig {
    /// The retry schedule applied at each inference call site
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts,
            base_delay: Duration::from_secs(self.backoff_base_secs),
            max_delay: Duration::from_secs(self.backoff_cap_secs),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_concurrency == 0 {
            return Err(PipelineError::Config(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }
        if self.retry_attempts == 0 {
            return Err(PipelineError::Config(
                "retry_attempts must be greater than 0".to_string(),
            ));
        }
        if self.chunk_size <= self.chunk_overlap {
            return Err(PipelineError::Config(format!(
                "chunk_size ({}) must be greater than chunk_overlap ({})",
                self.chunk_size, self.chunk_overlap
            )));
        }
        if self.backoff_base_secs > self.backoff_cap_secs {
            return Err(PipelineError::Config(
                "backoff_base_secs cannot exceed backoff_cap_secs".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| PipelineError::Config(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, PipelineError> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("failed to serialize to TOML: {e}")))
    }
}
