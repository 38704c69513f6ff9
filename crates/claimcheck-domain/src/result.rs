//! The terminal output of a verification run

use crate::claim::Claim;
use serde::{Deserialize, Serialize};

/// The single result value produced by every verification run
///
/// Exactly one `AnalysisResult` is produced per input document, under
/// every success and failure path. Degraded conditions are signaled only
/// through the title, status tokens, and markdown content, never through
/// a separate error channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Document title, when the model identified one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_title: Option<String>,

    /// Structured verdict records. Empty on the two-stage path; populated
    /// by the single-shot path and by degraded fallbacks.
    #[serde(default)]
    pub claims: Vec<Claim>,

    /// Combined markdown report (extraction section plus one verification
    /// block per claim, in original claim order)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_markdown: Option<String>,
}

impl AnalysisResult {
    /// Result for input with nothing to analyze
    pub fn empty() -> Self {
        Self {
            document_title: None,
            claims: Vec::new(),
            analysis_markdown: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = AnalysisResult::empty();
        assert!(result.document_title.is_none());
        assert!(result.claims.is_empty());
        assert!(result.analysis_markdown.is_none());
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let json = serde_json::to_string(&AnalysisResult::empty()).unwrap();
        assert!(!json.contains("document_title"));
        assert!(!json.contains("analysis_markdown"));
        assert!(json.contains("claims"));
    }
}
