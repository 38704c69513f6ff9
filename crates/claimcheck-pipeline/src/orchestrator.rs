//! The two-stage verification orchestrator
//!
//! Drives extraction, then fans out one verification call per claim
//! through a fixed-width concurrency gate, and reassembles the results
//! into one combined markdown report in original claim order. Every path
//! through this module ends in an `AnalysisResult`; failures degrade,
//! they never propagate.

use crate::chunks::assemble_document;
use crate::config::PipelineConfig;
use crate::parser::{parse_extraction, parse_single_shot};
use crate::prompt::{extraction_prompt, single_shot_prompt, verification_prompt};
use claimcheck_domain::{AnalysisResult, Claim, ClaimStatement, ClaimStatus, InferenceProvider};
use claimcheck_inference::retry_with_backoff;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Title used in markdown when the model found none
const DEFAULT_TITLE: &str = "Uploaded Document";

/// Title signaling a degraded whole-document result
const UNAVAILABLE_TITLE: &str = "Verification unavailable";

/// Body substituted for a claim whose verification exhausted its retries
const DEGRADED_BLOCK_BODY: &str =
    "Status: yellow\nExplanation: Verification failed due to an internal error\nCitations: none";

/// The verification pipeline entry point
///
/// Owns the provider and configuration for the lifetime of the service;
/// each `analyze` call is one independent run.
pub struct Verifier<P> {
    provider: Arc<P>,
    config: PipelineConfig,
}

impl<P> Verifier<P>
where
    P: InferenceProvider + Send + Sync + 'static,
{
    /// Create a verifier over the given provider
    pub fn new(provider: P, config: PipelineConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// Run the two-stage extract/verify workflow over pre-split text
    /// fragments.
    ///
    /// Infallible by contract: every success and failure path resolves to
    /// an `AnalysisResult`. Empty or whitespace-only input returns an
    /// empty result without calling the gateway.
    pub async fn analyze<S: AsRef<str>>(&self, fragments: &[S]) -> AnalysisResult {
        let document = assemble_document(fragments);
        if document.is_empty() {
            info!("nothing to analyze, returning empty result");
            return AnalysisResult::empty();
        }

        let policy = self.config.retry_policy();
        let prompt = extraction_prompt(&document);
        let response = match retry_with_backoff(policy, "claim extraction", |_| true, || {
            self.provider.generate(&prompt, "claim extraction")
        })
        .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!(error = %error, "claim extraction failed after retries");
                return degraded_result(&format!("Claim extraction failed: {error}"));
            }
        };

        let outcome = parse_extraction(&response);
        if outcome.statements.is_empty() {
            info!("no claims identified in extraction response");
            return AnalysisResult {
                document_title: outcome.title,
                claims: Vec::new(),
                analysis_markdown: Some(response.trim().to_string()),
            };
        }

        let claims: Vec<ClaimStatement> = outcome
            .statements
            .iter()
            .enumerate()
            .map(|(idx, text)| ClaimStatement::new(idx + 1, text.clone()))
            .collect();
        info!(claim_count = claims.len(), "starting verification stage");

        let blocks = self
            .verify_all(&claims, &document, outcome.title.as_deref())
            .await;

        let report = combined_report(outcome.title.as_deref(), response.trim(), &blocks);
        AnalysisResult {
            document_title: outcome.title,
            claims: Vec::new(),
            analysis_markdown: Some(report),
        }
    }

    /// Fan out one verification task per claim through the concurrency
    /// gate and return the blocks in original claim order.
    async fn verify_all(
        &self,
        claims: &[ClaimStatement],
        document: &str,
        title: Option<&str>,
    ) -> Vec<String> {
        let gate = Arc::new(Semaphore::new(self.config.max_concurrency));
        let policy = self.config.retry_policy();
        let total = claims.len();

        let handles: Vec<_> = claims
            .iter()
            .map(|claim| {
                let provider = Arc::clone(&self.provider);
                let gate = Arc::clone(&gate);
                let prompt = verification_prompt(&claim.text, document, title);
                let claim = claim.clone();
                tokio::spawn(async move {
                    let label = format!("verification {}/{}", claim.position, total);
                    // The permit is held for the whole call, including its
                    // retries, and released on completion either way.
                    let _permit = match gate.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => return degraded_block(&claim),
                    };
                    match retry_with_backoff(policy, &label, |_| true, || {
                        provider.generate(&prompt, &label)
                    })
                    .await
                    {
                        Ok(text) => verification_block(&claim, text.trim()),
                        Err(error) => {
                            warn!(
                                position = claim.position,
                                error = %error,
                                "claim verification failed after retries"
                            );
                            degraded_block(&claim)
                        }
                    }
                })
            })
            .collect();

        // Reassemble by claim index, not completion order. Awaiting the
        // handles in spawn order does not serialize the work; the tasks
        // are already running.
        let mut blocks = Vec::with_capacity(total);
        for (idx, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(block) => blocks.push(block),
                Err(error) => {
                    warn!(position = idx + 1, error = %error, "verification task aborted");
                    blocks.push(degraded_block(&claims[idx]));
                }
            }
        }
        blocks
    }

    /// Run the legacy single-call JSON workflow.
    ///
    /// This is the only path that populates structured `claims` records;
    /// the two-stage path reports through markdown instead. Kept for
    /// callers needing typed per-claim data.
    pub async fn analyze_single_shot<S: AsRef<str>>(&self, fragments: &[S]) -> AnalysisResult {
        let document = assemble_document(fragments);
        if document.is_empty() {
            return AnalysisResult::empty();
        }

        let policy = self.config.retry_policy();
        let prompt = single_shot_prompt(&document);
        let response = match retry_with_backoff(policy, "single-shot analysis", |_| true, || {
            self.provider.generate(&prompt, "single-shot analysis")
        })
        .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!(error = %error, "single-shot analysis failed after retries");
                return degraded_result(&format!("Analysis request failed: {error}"));
            }
        };

        match parse_single_shot(&response) {
            Some(outcome) => {
                if outcome.claims.is_empty() {
                    warn!("single-shot response contained no claims");
                }
                AnalysisResult {
                    document_title: outcome.title.or_else(|| Some(DEFAULT_TITLE.to_string())),
                    claims: outcome.claims,
                    analysis_markdown: None,
                }
            }
            None => {
                warn!("single-shot response could not be parsed");
                degraded_result("The model response could not be parsed.")
            }
        }
    }
}

/// One verification block: header, the claim, then the model's answer
/// embedded verbatim
fn verification_block(claim: &ClaimStatement, body: &str) -> String {
    format!("### Claim {}\n\n{}\n\n{}", claim.position, claim.text, body)
}

fn degraded_block(claim: &ClaimStatement) -> String {
    verification_block(claim, DEGRADED_BLOCK_BODY)
}

fn combined_report(title: Option<&str>, extraction_body: &str, blocks: &[String]) -> String {
    let mut report = String::new();
    report.push_str(&format!("# {}\n\n", title.unwrap_or(DEFAULT_TITLE)));
    report.push_str("## Extraction\n\n");
    report.push_str(extraction_body);
    report.push_str("\n\n## Verifications\n\n");
    report.push_str(&blocks.join("\n\n"));
    report
}

/// Whole-run fallback: one synthetic claim, an explanatory body, and the
/// unavailable title. Signaled through content, never an error channel.
fn degraded_result(reason: &str) -> AnalysisResult {
    AnalysisResult {
        document_title: Some(UNAVAILABLE_TITLE.to_string()),
        claims: vec![Claim {
            statement: "We could not verify claims for this document.".to_string(),
            status: ClaimStatus::Yellow,
            explanation: Some(reason.to_string()),
            citations: Vec::new(),
        }],
        analysis_markdown: Some(format!("# {UNAVAILABLE_TITLE}\n\n{reason}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(position: usize, text: &str) -> ClaimStatement {
        ClaimStatement::new(position, text)
    }

    #[test]
    fn test_verification_block_layout() {
        let block = verification_block(&claim(2, "Revenue grew 10%"), "Status: green");
        assert_eq!(block, "### Claim 2\n\nRevenue grew 10%\n\nStatus: green");
    }

    #[test]
    fn test_degraded_block_has_fixed_body() {
        let block = degraded_block(&claim(4, "X"));
        assert!(block.starts_with("### Claim 4"));
        assert!(block.contains("Status: yellow"));
        assert!(block.contains("Verification failed due to an internal error"));
        assert!(block.contains("Citations: none"));
    }

    #[test]
    fn test_combined_report_sections() {
        let blocks = vec!["### Claim 1\n\nA\n\nStatus: green".to_string()];
        let report = combined_report(Some("Annual Report"), "Title: Annual Report", &blocks);
        assert!(report.starts_with("# Annual Report\n\n## Extraction\n\n"));
        assert!(report.contains("## Verifications\n\n### Claim 1"));
    }

    #[test]
    fn test_combined_report_default_title() {
        let report = combined_report(None, "body", &[]);
        assert!(report.starts_with("# Uploaded Document"));
    }

    #[test]
    fn test_degraded_result_shape() {
        let result = degraded_result("something broke");
        assert_eq!(result.document_title.as_deref(), Some("Verification unavailable"));
        assert_eq!(result.claims.len(), 1);
        assert_eq!(result.claims[0].status, ClaimStatus::Yellow);
        assert_eq!(
            result.claims[0].statement,
            "We could not verify claims for this document."
        );
        assert!(result.analysis_markdown.unwrap().contains("something broke"));
    }
}
