//! Prompt construction for the review model.
//!
//! The schema text embedded here is the contract the decoder parses against;
//! the two must stay in lockstep.

const SYSTEM_PROMPT: &str = "\
You are a senior staff engineer performing strict code reviews. \
Return only valid JSON.";

/// Build the system prompt for chat-style providers.
///
/// # Examples
///
/// ```
/// use vigil_review::prompt::build_system_prompt;
///
/// let prompt = build_system_prompt();
/// assert!(prompt.contains("valid JSON"));
/// ```
pub fn build_system_prompt() -> String {
    SYSTEM_PROMPT.to_string()
}

/// Build the review prompt embedding the (already bounded) patch.
///
/// Pure and deterministic: the same patch always yields the same prompt.
/// The patch is delimited by `---BEGIN DIFF---` / `---END DIFF---` markers
/// so it cannot be confused with the instructions.
///
/// # Examples
///
/// ```
/// use vigil_review::prompt::build_review_prompt;
///
/// let prompt = build_review_prompt("+added line");
/// assert!(prompt.contains("+added line"));
/// assert!(prompt.contains("---BEGIN DIFF---"));
/// ```
pub fn build_review_prompt(patch: &str) -> String {
    format!(
        r#"You are a senior staff engineer performing a strict code review.
Return ONLY a JSON object matching this schema (use keys exactly):
{{
  "summary": string,
  "findings": [
    {{ "file": string, "line": number, "severity": "Info" | "Low" | "Medium" | "High",
      "title": string, "explanation": string, "suggested_fix": string }}
  ]
}}
Guidelines:
- Severity levels (use exact case): "Info", "Low", "Medium", "High"
- Focus on correctness, security, performance, resource leaks, concurrency, API breakage.
- Use "High" for security issues, data loss, breaking changes
- Use "Medium" for performance issues, code smells
- Use "Low" for style issues, minor improvements
- Use "Info" for suggestions
- If the line cannot be determined, set line=1 and say so in the explanation.
- Keep suggested fixes minimal and actionable.

Input is a unified diff between BASE and HEAD:
---BEGIN DIFF---
{patch}
---END DIFF---
"#
    )
}
