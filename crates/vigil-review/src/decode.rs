//! Defensive decoding of the model's answer into a [`ReviewResult`].
//!
//! The model is an untrusted text producer: the decoder accepts minor
//! formatting slips (field-name casing, trailing commas), but anything that
//! breaks the schema, including an unrecognized severity, is a decode
//! failure. Failures are never silent: [`decode_or_fallback`] logs the error
//! together with the offending raw text before substituting a fallback
//! result.

use serde_json::Value;

use vigil_core::{Finding, ReviewResult, Severity, VigilError};

use crate::sanitize::sanitize;

/// Summary used when the model's output could not be decoded.
pub const FALLBACK_SUMMARY: &str =
    "The model returned no valid review JSON. Check the server logs for the raw output.";

/// Parse sanitized model output against the review schema.
///
/// Field names are matched case-insensitively and trailing commas are
/// tolerated. `summary` and `findings` are required; within a finding the
/// free-text fields default to empty, `line` defaults to 1 when missing or
/// out of range, and `severity` must be one of the four canonical names with
/// exact case.
///
/// # Errors
///
/// Returns [`VigilError::Decode`] when the text is not a JSON object of the
/// expected shape.
///
/// # Examples
///
/// ```
/// use vigil_review::decode::decode;
///
/// let result = decode(r#"{"summary":"ok","findings":[]}"#).unwrap();
/// assert_eq!(result.summary, "ok");
/// assert!(result.findings.is_empty());
/// ```
pub fn decode(sanitized: &str) -> Result<ReviewResult, VigilError> {
    let stripped = strip_trailing_commas(sanitized);
    let value: Value = serde_json::from_str(&stripped)
        .map_err(|e| VigilError::Decode(format!("invalid JSON: {e}")))?;

    let obj = value
        .as_object()
        .ok_or_else(|| VigilError::Decode("expected a JSON object".into()))?;

    let summary = get_ci(obj, "summary")
        .and_then(Value::as_str)
        .ok_or_else(|| VigilError::Decode("missing or non-string \"summary\"".into()))?
        .to_string();

    let raw_findings = get_ci(obj, "findings")
        .and_then(Value::as_array)
        .ok_or_else(|| VigilError::Decode("missing \"findings\" array".into()))?;

    let mut findings = Vec::with_capacity(raw_findings.len());
    for (i, item) in raw_findings.iter().enumerate() {
        let fo = item
            .as_object()
            .ok_or_else(|| VigilError::Decode(format!("finding {i} is not an object")))?;

        let severity_str = get_ci(fo, "severity")
            .and_then(Value::as_str)
            .ok_or_else(|| VigilError::Decode(format!("finding {i}: missing \"severity\"")))?;
        let severity = Severity::from_wire(severity_str).ok_or_else(|| {
            VigilError::Decode(format!("finding {i}: unknown severity {severity_str:?}"))
        })?;

        let line = match get_ci(fo, "line").and_then(Value::as_u64) {
            Some(l) if l >= 1 => u32::try_from(l).unwrap_or(u32::MAX),
            _ => 1,
        };

        let text = |key: &str| {
            get_ci(fo, key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        findings.push(Finding {
            file: text("file"),
            line,
            severity,
            title: text("title"),
            explanation: text("explanation"),
            suggested_fix: text("suggested_fix"),
        });
    }

    Ok(ReviewResult { summary, findings })
}

/// Sanitize and decode raw model output, substituting a fallback result on
/// any failure.
///
/// The failure is logged to stderr with the offending raw text so a
/// misbehaving model is observable even though the pipeline keeps going.
///
/// # Examples
///
/// ```
/// use vigil_review::decode::decode_or_fallback;
///
/// let result = decode_or_fallback("the model rambled instead of emitting JSON");
/// assert!(result.findings.is_empty());
/// assert!(!result.summary.is_empty());
/// ```
pub fn decode_or_fallback(raw: &str) -> ReviewResult {
    let cleaned = sanitize(raw);
    match decode(&cleaned) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("warning: failed to decode model response: {e}; raw output: {raw}");
            ReviewResult::fallback(FALLBACK_SUMMARY)
        }
    }
}

// Case-insensitive key lookup; the first matching key wins.
fn get_ci<'a>(obj: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

// Drop commas that directly precede a closing brace or bracket, outside of
// strings, so `{"a":1,}` and `[1,2,]` parse.
fn strip_trailing_commas(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = s[i + 1..].chars().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_well_formed_response() {
        let json = r#"{
            "summary": "One issue found.",
            "findings": [
                {
                    "file": "src/db.rs",
                    "line": 17,
                    "severity": "High",
                    "title": "SQL injection",
                    "explanation": "User input is interpolated into the query.",
                    "suggested_fix": "Use a parameterized query."
                }
            ]
        }"#;
        let result = decode(json).unwrap();
        assert_eq!(result.summary, "One issue found.");
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].severity, Severity::High);
        assert_eq!(result.findings[0].line, 17);
        assert_eq!(result.findings[0].file, "src/db.rs");
    }

    #[test]
    fn roundtrip_through_serde() {
        let original = ReviewResult {
            summary: "Two findings.".into(),
            findings: vec![
                Finding {
                    file: "a.rs".into(),
                    line: 3,
                    severity: Severity::Medium,
                    title: "Needless clone".into(),
                    explanation: "The vector is cloned on every call.".into(),
                    suggested_fix: "Borrow instead.".into(),
                },
                Finding {
                    file: "b.rs".into(),
                    line: 1,
                    severity: Severity::Info,
                    title: "Naming".into(),
                    explanation: "Consider a clearer name.".into(),
                    suggested_fix: "".into(),
                },
            ],
        };
        let encoded = serde_json::to_string(&original).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn empty_findings_is_a_normal_outcome() {
        let result = decode(r#"{"summary":"Clean.","findings":[]}"#).unwrap();
        assert!(result.findings.is_empty());
    }

    #[test]
    fn field_names_match_case_insensitively() {
        let json = r#"{
            "Summary": "ok",
            "FINDINGS": [
                {"File":"x.rs","Line":2,"Severity":"Low","Title":"t","Explanation":"e","Suggested_Fix":"f"}
            ]
        }"#;
        let result = decode(json).unwrap();
        assert_eq!(result.summary, "ok");
        assert_eq!(result.findings[0].line, 2);
        assert_eq!(result.findings[0].suggested_fix, "f");
    }

    #[test]
    fn trailing_commas_are_tolerated() {
        let json = r#"{
            "summary": "ok",
            "findings": [
                {"file":"x.rs","line":1,"severity":"Info","title":"t","explanation":"e","suggested_fix":"f",},
            ],
        }"#;
        let result = decode(json).unwrap();
        assert_eq!(result.findings.len(), 1);
    }

    #[test]
    fn comma_inside_string_survives_stripping() {
        let json = r#"{"summary":"a, }","findings":[]}"#;
        let result = decode(json).unwrap();
        assert_eq!(result.summary, "a, }");
    }

    #[test]
    fn unknown_severity_is_a_decode_failure() {
        let json = r#"{"summary":"ok","findings":[
            {"file":"x.rs","line":1,"severity":"high","title":"t","explanation":"e","suggested_fix":"f"}
        ]}"#;
        let err = decode(json).unwrap_err();
        assert!(err.to_string().contains("severity"));
    }

    #[test]
    fn missing_line_defaults_to_one() {
        let json = r#"{"summary":"ok","findings":[
            {"file":"x.rs","severity":"Low","title":"t","explanation":"e","suggested_fix":"f"}
        ]}"#;
        let result = decode(json).unwrap();
        assert_eq!(result.findings[0].line, 1);
    }

    #[test]
    fn zero_or_negative_line_defaults_to_one() {
        let json = r#"{"summary":"ok","findings":[
            {"file":"x.rs","line":0,"severity":"Low","title":"t","explanation":"e","suggested_fix":"f"},
            {"file":"y.rs","line":-4,"severity":"Low","title":"t","explanation":"e","suggested_fix":"f"}
        ]}"#;
        let result = decode(json).unwrap();
        assert_eq!(result.findings[0].line, 1);
        assert_eq!(result.findings[1].line, 1);
    }

    #[test]
    fn missing_summary_is_a_decode_failure() {
        assert!(decode(r#"{"findings":[]}"#).is_err());
    }

    #[test]
    fn missing_findings_is_a_decode_failure() {
        assert!(decode(r#"{"summary":"ok"}"#).is_err());
    }

    #[test]
    fn garbage_falls_back_with_nonempty_summary() {
        let result = decode_or_fallback("I could not find anything wrong, great job!");
        assert!(result.findings.is_empty());
        assert!(!result.summary.is_empty());
        assert_eq!(result.summary, FALLBACK_SUMMARY);
    }

    #[test]
    fn fenced_output_decodes_via_fallback_path() {
        let raw = "```json\n{\"summary\":\"ok\",\"findings\":[]}\n```";
        let result = decode_or_fallback(raw);
        assert_eq!(result.summary, "ok");
    }

    #[test]
    fn fallback_path_preserves_valid_output() {
        let raw = r#"{"summary":"fine","findings":[]}"#;
        assert_eq!(decode_or_fallback(raw).summary, "fine");
    }
}
