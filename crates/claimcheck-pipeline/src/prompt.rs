//! Prompt construction for the extraction and verification stages
//!
//! Pure functions of their inputs; prompt length is the caller's
//! responsibility. The markdown shapes requested here are what
//! `parser` expects on the way back.

const EXTRACTION_INSTRUCTIONS: &str = r#"You are an expert fact-checking agent. You will be given the extracted text of a document. Identify the most significant factual claims, assertions, statistics, or concrete statements that could be checked against external sources.

Respond in markdown with exactly this shape and no other content:

Title: <the document's title, or "none" if it has no discernible title>
Claims:
- <first checkable claim>
- <second checkable claim>

One bullet per claim. Do not number the claims, and do not add commentary before or after the list."#;

const VERIFICATION_INSTRUCTIONS: &str = r#"You are an expert fact-checking agent participating in a grounded verification workflow. Verify the single claim below against credible external sources, using the document text only as context. Respond in markdown with exactly three fields and no other content:

Status: <green|yellow|red>
Explanation: <short rationale>
Citations:
- <source> — <supporting or refuting quote> (<direct URL>)

Use "green" when the claim is verified as accurate by credible sources, "yellow" when no sufficient evidence was found either way, and "red" when the claim is likely inaccurate or contradicted by evidence. When no citations are available, write "Citations: none" instead of the bulleted list."#;

const SINGLE_SHOT_INSTRUCTIONS: &str = r#"You are an expert fact-checking agent participating in a grounded verification workflow.
You will be given the extracted text of a document. Your task is to:
1. Identify the most significant factual claims, assertions, statistics, or concrete statements that could be checked.
2. For each claim, retrieve supporting or refuting evidence from credible sources.
3. Classify each claim with one of three labels:
   - green: The claim is verified as accurate based on credible sources. Provide at least one citation.
   - yellow: No sufficient evidence was found to verify the claim. Provide an explanation and leave citations empty.
   - red: The claim is likely inaccurate or contradicted by evidence. Provide citations that refute the claim.
4. Return a strict JSON object that matches the following schema:
{
  "document_title": "<optional string title or null>",
  "claims": [
    {
      "statement": "<original claim text>",
      "status": "<green|yellow|red>",
      "explanation": "<short rationale>",
      "citations": [
        {
          "source": "<source title or domain>",
          "snippet": "<supporting or refuting quote>",
          "url": "<direct URL to the source>"
        }
      ]
    }
  ]
}
Respect the schema exactly. Do not include any additional fields. When citations are unavailable, return an empty array."#;

/// Build the stage-1 prompt asking the model to list checkable claims
pub fn extraction_prompt(document: &str) -> String {
    format!("{EXTRACTION_INSTRUCTIONS}\n\nDocument text:\n{document}")
}

/// Build the stage-2 prompt verifying one claim in document context
pub fn verification_prompt(claim: &str, document: &str, title: Option<&str>) -> String {
    let mut prompt = String::with_capacity(
        VERIFICATION_INSTRUCTIONS.len() + claim.len() + document.len() + 128,
    );
    prompt.push_str(VERIFICATION_INSTRUCTIONS);
    prompt.push_str("\n\n");
    if let Some(title) = title {
        prompt.push_str(&format!("Document title: {title}\n\n"));
    }
    prompt.push_str(&format!("Claim under review:\n{claim}\n\n"));
    prompt.push_str(&format!("Document text:\n{document}"));
    prompt
}

/// Build the legacy single-call prompt requesting a JSON verdict object
pub fn single_shot_prompt(document: &str) -> String {
    format!("{SINGLE_SHOT_INSTRUCTIONS}\n\nDocument text:\n{document}")
}
