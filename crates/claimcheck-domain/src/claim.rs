//! Claim types - the fundamental units of a verification run

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict assigned to a claim by the verification model
///
/// The three-color convention mirrors the upstream prompt contract:
/// green means verified against credible sources, yellow means no
/// sufficient evidence either way, red means likely inaccurate or
/// contradicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    /// Verified as accurate based on credible sources
    Green,
    /// No sufficient evidence found to verify or refute
    Yellow,
    /// Likely inaccurate or contradicted by evidence
    Red,
}

impl ClaimStatus {
    /// Parse a status token leniently.
    ///
    /// The remote model does not reliably stick to the three canonical
    /// tokens, so common synonyms are folded in and anything
    /// unrecognized resolves to [`ClaimStatus::Yellow`].
    ///
    /// # Examples
    ///
    /// ```
    /// use claimcheck_domain::ClaimStatus;
    ///
    /// assert_eq!(ClaimStatus::parse_lenient("Verified"), ClaimStatus::Green);
    /// assert_eq!(ClaimStatus::parse_lenient("nonsense"), ClaimStatus::Yellow);
    /// ```
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "green" | "verified" => ClaimStatus::Green,
            "red" | "inaccurate" | "false" => ClaimStatus::Red,
            _ => ClaimStatus::Yellow,
        }
    }

    /// The canonical lowercase token for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Green => "green",
            ClaimStatus::Yellow => "yellow",
            ClaimStatus::Red => "red",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single supporting or refuting source for a claim verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Source title or domain
    pub source: String,

    /// Supporting or refuting quote, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Direct URL to the source, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A structured verdict record for one claim
///
/// Populated by the single-shot analysis path and by degraded fallbacks.
/// The two-stage path deliberately leaves these empty and reports through
/// markdown instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// The original claim text
    pub statement: String,

    /// Verdict for this claim
    pub status: ClaimStatus,

    /// Short rationale for the verdict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    /// Sources supporting or refuting the claim
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// A checkable statement extracted from a document during stage 1
///
/// The position is 1-based and significant: the final combined report
/// lists verification blocks in extraction order, regardless of the order
/// in which concurrent verification calls complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimStatement {
    /// 1-based position among the extracted claims
    pub position: usize,

    /// The claim text
    pub text: String,
}

impl ClaimStatement {
    /// Create a claim statement at the given 1-based position
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lenient_green_synonyms() {
        assert_eq!(ClaimStatus::parse_lenient("green"), ClaimStatus::Green);
        assert_eq!(ClaimStatus::parse_lenient("VERIFIED"), ClaimStatus::Green);
    }

    #[test]
    fn test_status_lenient_red_synonyms() {
        assert_eq!(ClaimStatus::parse_lenient("red"), ClaimStatus::Red);
        assert_eq!(ClaimStatus::parse_lenient("inaccurate"), ClaimStatus::Red);
        assert_eq!(ClaimStatus::parse_lenient("False"), ClaimStatus::Red);
    }

    #[test]
    fn test_status_lenient_defaults_to_yellow() {
        assert_eq!(ClaimStatus::parse_lenient("yellow"), ClaimStatus::Yellow);
        assert_eq!(ClaimStatus::parse_lenient("unverified"), ClaimStatus::Yellow);
        assert_eq!(ClaimStatus::parse_lenient("unknown"), ClaimStatus::Yellow);
        assert_eq!(ClaimStatus::parse_lenient(""), ClaimStatus::Yellow);
        assert_eq!(ClaimStatus::parse_lenient("banana"), ClaimStatus::Yellow);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ClaimStatus::Green).unwrap();
        assert_eq!(json, "\"green\"");
    }

    #[test]
    fn test_claim_serialization_omits_empty_optionals() {
        let claim = Claim {
            statement: "Revenue grew 10%".to_string(),
            status: ClaimStatus::Yellow,
            explanation: None,
            citations: vec![],
        };
        let json = serde_json::to_string(&claim).unwrap();
        assert!(!json.contains("explanation"));
        assert!(json.contains("citations"));
    }

    #[test]
    fn test_claim_statement_position() {
        let stmt = ClaimStatement::new(3, "Headcount doubled");
        assert_eq!(stmt.position, 3);
        assert_eq!(stmt.text, "Headcount doubled");
    }
}
