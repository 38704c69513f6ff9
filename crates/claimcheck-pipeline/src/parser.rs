//! Defensive parsing of model responses
//!
//! The upstream model is format-inconsistent: keywords vary in case,
//! sentinel values stand in for missing titles, bullets go missing, and
//! JSON arrives wrapped in markdown fences. Extraction parsing never
//! fails; a response that defies the convention degrades to zero or one
//! claim. The per-claim verification response is deliberately not parsed
//! into fields at all: it is embedded verbatim by the orchestrator, which
//! avoids silently misclassifying free text the model never promised to
//! structure.

use claimcheck_domain::{Citation, Claim, ClaimStatus};
use serde_json::Value;
use tracing::debug;

/// Title values that mean "no title", not a title
const TITLE_SENTINELS: &[&str] = &["none", "n/a"];

/// Parsed stage-1 response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionOutcome {
    /// Document title, when the model identified one
    pub title: Option<String>,

    /// Claim statements in response order
    pub statements: Vec<String>,
}

/// Parse the stage-1 claim-listing response.
///
/// Line-oriented and case-insensitive on field keywords:
/// - `Title: <text>` sets the title unless the remainder is empty or a
///   sentinel (`none`, `n/a`)
/// - `Claims:` is a section marker and contributes nothing
/// - `- <text>` contributes one trimmed, non-empty claim statement
/// - anything else is ignored
///
/// If no bullet lines were found but the response is non-empty, the whole
/// trimmed response becomes a single claim statement.
pub fn parse_extraction(response: &str) -> ExtractionOutcome {
    let mut outcome = ExtractionOutcome::default();
    let mut saw_bullet = false;

    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = strip_prefix_ci(line, "title:") {
            let rest = rest.trim();
            let is_sentinel = TITLE_SENTINELS
                .iter()
                .any(|sentinel| rest.eq_ignore_ascii_case(sentinel));
            if !rest.is_empty() && !is_sentinel {
                outcome.title = Some(rest.to_string());
            }
            continue;
        }
        if strip_prefix_ci(line, "claims:").is_some() {
            continue;
        }
        if let Some(rest) = line.strip_prefix('-') {
            saw_bullet = true;
            let statement = rest.trim();
            if !statement.is_empty() {
                outcome.statements.push(statement.to_string());
            }
            continue;
        }
        // Prose outside the convention is ignored
    }

    if !saw_bullet && outcome.statements.is_empty() {
        let whole = response.trim();
        if !whole.is_empty() {
            debug!("no bullet lines in extraction response, treating body as one claim");
            outcome.statements.push(whole.to_string());
        }
    }

    outcome
}

/// Parsed single-shot JSON response
#[derive(Debug, Clone, PartialEq)]
pub struct SingleShotOutcome {
    /// Document title, when present and non-empty
    pub title: Option<String>,

    /// Structured verdict records, one per parseable claim entry
    pub claims: Vec<Claim>,
}

/// Parse the legacy single-call JSON verdict response.
///
/// Strips markdown code fences, then maps the JSON object leniently:
/// entries without a statement are skipped, unrecognized statuses resolve
/// to yellow, and citations missing a source fall back to "Unknown
/// source". Returns `None` when the response is not a JSON object at all.
pub fn parse_single_shot(response: &str) -> Option<SingleShotOutcome> {
    let json_str = strip_code_fences(response);
    let value: Value = serde_json::from_str(&json_str).ok()?;
    let object = value.as_object()?;

    let title = object
        .get("document_title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(String::from);

    let empty = Vec::new();
    let entries = object
        .get("claims")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let mut claims = Vec::new();
    for entry in entries {
        let Some(entry) = entry.as_object() else {
            continue;
        };
        let Some(statement) = entry
            .get("statement")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|statement| !statement.is_empty())
        else {
            continue;
        };
        let status = entry
            .get("status")
            .and_then(Value::as_str)
            .map(ClaimStatus::parse_lenient)
            .unwrap_or(ClaimStatus::Yellow);
        let explanation = entry
            .get("explanation")
            .and_then(Value::as_str)
            .map(String::from);
        let citations = entry
            .get("citations")
            .and_then(Value::as_array)
            .map(|raw| raw.iter().filter_map(parse_citation).collect())
            .unwrap_or_default();

        claims.push(Claim {
            statement: statement.to_string(),
            status,
            explanation,
            citations,
        });
    }

    Some(SingleShotOutcome { title, claims })
}

fn parse_citation(value: &Value) -> Option<Citation> {
    let object = value.as_object()?;
    let source = object
        .get("source")
        .or_else(|| object.get("title"))
        .and_then(Value::as_str)
        .filter(|source| !source.trim().is_empty())
        .unwrap_or("Unknown source");
    Some(Citation {
        source: source.to_string(),
        snippet: object.get("snippet").and_then(Value::as_str).map(String::from),
        url: object.get("url").and_then(Value::as_str).map(String::from),
    })
}

/// Case-insensitive ASCII prefix strip, safe on multi-byte input
fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    match line.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&line[prefix.len()..]),
        _ => None,
    }
}

/// Strip markdown code fences if present, returning the inner content
fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let mut lines: Vec<&str> = trimmed.lines().collect();
    lines.remove(0);
    if lines
        .last()
        .map_or(false, |line| line.trim_start().starts_with("```"))
    {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}
