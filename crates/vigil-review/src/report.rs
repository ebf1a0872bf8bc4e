//! Render a review result for humans: Markdown for the PR comment body,
//! plain text for the terminal.

use vigil_core::{ReviewResult, Severity};

const SEVERITY_ORDER: [Severity; 4] = [
    Severity::High,
    Severity::Medium,
    Severity::Low,
    Severity::Info,
];

fn badge(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "\u{1f534}",
        Severity::Medium => "\u{1f7e1}",
        Severity::Low => "\u{1f535}",
        Severity::Info => "\u{2139}\u{fe0f}",
    }
}

// Table cells cannot hold pipes or newlines.
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Render the review as the Markdown body posted to the pull request.
///
/// # Examples
///
/// ```
/// use vigil_core::ReviewResult;
/// use vigil_review::report::to_markdown;
///
/// let result = ReviewResult { summary: "All clear.".into(), findings: vec![] };
/// let md = to_markdown(&result);
/// assert!(md.contains("All clear."));
/// assert!(md.contains("No issues found."));
/// ```
pub fn to_markdown(result: &ReviewResult) -> String {
    let mut md = format!(
        "### \u{1f916} AI Code Review Summary\n\n{}\n\n",
        result.summary
    );

    if result.findings.is_empty() {
        md.push_str("\u{2705} No issues found.");
        return md;
    }

    md.push_str("**Issue Summary:**\n");
    for severity in SEVERITY_ORDER {
        let count = result
            .findings
            .iter()
            .filter(|f| f.severity == severity)
            .count();
        if count > 0 {
            md.push_str(&format!("- {} {severity}: {count}\n", badge(severity)));
        }
    }

    md.push_str("\n| Severity | File:Line | Title | Suggestion |\n|---|---|---|---|\n");
    for f in &result.findings {
        md.push_str(&format!(
            "| {} {} | `{}:{}` | {} | {} |\n",
            badge(f.severity),
            f.severity,
            f.file,
            f.line,
            escape_cell(&f.title),
            escape_cell(&f.suggested_fix),
        ));
    }
    md.push_str("\n> Detailed explanations are in the tool output.\n");
    md
}

/// Render the review as plain terminal text.
///
/// # Examples
///
/// ```
/// use vigil_core::ReviewResult;
/// use vigil_review::report::to_text;
///
/// let result = ReviewResult { summary: "All clear.".into(), findings: vec![] };
/// assert!(to_text(&result).contains("No issues found."));
/// ```
pub fn to_text(result: &ReviewResult) -> String {
    let mut out = String::new();
    out.push_str("Review Summary\n");
    out.push_str("==============\n");
    out.push_str(&result.summary);
    out.push_str("\n\n");

    if result.findings.is_empty() {
        out.push_str("No issues found.\n");
        return out;
    }

    for f in &result.findings {
        out.push_str(&format!(
            "[{}] {}:{}\n",
            f.severity.to_string().to_uppercase(),
            f.file,
            f.line,
        ));
        out.push_str(&format!("  {}\n", f.title));
        if !f.explanation.is_empty() {
            out.push_str(&format!("  {}\n", f.explanation));
        }
        if !f.suggested_fix.is_empty() {
            out.push_str(&format!("  Suggested fix: {}\n", f.suggested_fix));
        }
        out.push('\n');
    }
    out
}
