use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Issue severity level reported by the model.
///
/// On the wire these serialize to exactly `"Info"`, `"Low"`, `"Medium"`,
/// `"High"` — the same strings the prompt instructs the model to emit.
///
/// # Examples
///
/// ```
/// use vigil_core::Severity;
///
/// let s: Severity = serde_json::from_str("\"High\"").unwrap();
/// assert_eq!(s, Severity::High);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// A suggestion worth mentioning.
    Info,
    /// Style issue or minor improvement.
    Low,
    /// Performance issue or code smell.
    Medium,
    /// Security issue, data loss, or breaking change.
    High,
}

impl Severity {
    /// Match a wire value against the four canonical names, case-sensitively.
    ///
    /// Returns `None` for anything else — an unrecognized severity is a
    /// decode failure, never a silent default.
    ///
    /// # Examples
    ///
    /// ```
    /// use vigil_core::Severity;
    ///
    /// assert_eq!(Severity::from_wire("Medium"), Some(Severity::Medium));
    /// assert_eq!(Severity::from_wire("medium"), None);
    /// ```
    pub fn from_wire(s: &str) -> Option<Severity> {
        match s {
            "Info" => Some(Severity::Info),
            "Low" => Some(Severity::Low),
            "Medium" => Some(Severity::Medium),
            "High" => Some(Severity::High),
            _ => None,
        }
    }

    /// Presentation rank, most severe first.
    ///
    /// # Examples
    ///
    /// ```
    /// use vigil_core::Severity;
    ///
    /// assert!(Severity::High.rank() < Severity::Info.rank());
    /// ```
    pub fn rank(self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Medium => 1,
            Severity::Low => 2,
            Severity::Info => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "Info"),
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    /// Lenient parse for CLI and config use; the decoder uses
    /// [`Severity::from_wire`] instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// One reviewer observation reported by the model.
///
/// The `file` path is reported by the model and is not validated against the
/// diff. Findings have no identity beyond their position in the result's
/// ordered list.
///
/// # Examples
///
/// ```
/// use vigil_core::{Finding, Severity};
///
/// let finding = Finding {
///     file: "src/auth.rs".into(),
///     line: 42,
///     severity: Severity::High,
///     title: "Token logged in plaintext".into(),
///     explanation: "The bearer token is written to the debug log.".into(),
///     suggested_fix: "Redact the token before logging.".into(),
/// };
/// assert_eq!(finding.severity, Severity::High);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Source path as reported by the model (untrusted).
    pub file: String,
    /// Line number, 1-based; 1 when the model could not determine one.
    pub line: u32,
    /// Severity of the finding.
    pub severity: Severity,
    /// Short issue title.
    pub title: String,
    /// Explanation of the issue.
    pub explanation: String,
    /// Minimal, actionable fix suggestion.
    pub suggested_fix: String,
}

/// The decoded review for one patch: a summary plus ordered findings.
///
/// Constructed exactly once per review invocation, either from a successful
/// decode or from [`ReviewResult::fallback`] when anything upstream failed,
/// and immutable afterwards. An empty `findings` list is a normal outcome
/// meaning "no issues found".
///
/// # Examples
///
/// ```
/// use vigil_core::ReviewResult;
///
/// let result = ReviewResult {
///     summary: "Looks good.".into(),
///     findings: vec![],
/// };
/// assert!(!result.has_high_severity());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    /// Free-text summary, always present.
    pub summary: String,
    /// Findings in the order the model emitted them; may be empty.
    pub findings: Vec<Finding>,
}

impl ReviewResult {
    /// Build a degraded result carrying only an explanatory summary.
    ///
    /// Used whenever the provider call or the decode fails, so the pipeline
    /// still produces exactly one well-formed response.
    ///
    /// # Examples
    ///
    /// ```
    /// use vigil_core::ReviewResult;
    ///
    /// let result = ReviewResult::fallback("Review failed: connection reset");
    /// assert!(result.findings.is_empty());
    /// assert!(result.summary.contains("connection reset"));
    /// ```
    pub fn fallback(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            findings: Vec::new(),
        }
    }

    /// Returns `true` if any finding is [`Severity::High`].
    pub fn has_high_severity(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::High)
    }
}

/// The review disposition sent to the hosting platform.
///
/// # Examples
///
/// ```
/// use vigil_core::Verdict;
///
/// assert_eq!(Verdict::RequestChanges.as_event(), "REQUEST_CHANGES");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Approve the pull request.
    Approve,
    /// Leave a neutral comment.
    Comment,
    /// Request changes.
    RequestChanges,
}

impl Verdict {
    /// The GitHub review event string for this verdict.
    pub fn as_event(self) -> &'static str {
        match self {
            Verdict::Approve => "APPROVE",
            Verdict::Comment => "COMMENT",
            Verdict::RequestChanges => "REQUEST_CHANGES",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_event())
    }
}

/// How the decided verdict is derived from a review result.
///
/// Parsing is total: unrecognized values fall back to
/// [`PostingMode::Comment`], so a typo in configuration degrades to the
/// neutral behavior instead of halting the pipeline.
///
/// # Examples
///
/// ```
/// use vigil_core::PostingMode;
///
/// assert_eq!(PostingMode::parse("request_changes"), PostingMode::RequestChangesOnHigh);
/// assert_eq!(PostingMode::parse("shout-loudly"), PostingMode::Comment);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostingMode {
    /// Always approve.
    Approve,
    /// Always comment.
    #[default]
    Comment,
    /// Request changes when any High-severity finding is present.
    RequestChangesOnHigh,
}

impl PostingMode {
    /// Parse a configuration token, falling back to `Comment`.
    pub fn parse(s: &str) -> PostingMode {
        match s.to_lowercase().as_str() {
            "approve" => PostingMode::Approve,
            "request_changes" => PostingMode::RequestChangesOnHigh,
            _ => PostingMode::Comment,
        }
    }

    /// The canonical configuration token for this mode.
    pub fn as_token(self) -> &'static str {
        match self {
            PostingMode::Approve => "approve",
            PostingMode::Comment => "comment",
            PostingMode::RequestChangesOnHigh => "request_changes",
        }
    }
}

impl Serialize for PostingMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

impl<'de> Deserialize<'de> for PostingMode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(PostingMode::parse(&token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_roundtrips_through_json() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, "\"High\"");

        let parsed: Severity = serde_json::from_str("\"Low\"").unwrap();
        assert_eq!(parsed, Severity::Low);
    }

    #[test]
    fn severity_from_wire_is_case_sensitive() {
        assert_eq!(Severity::from_wire("Info"), Some(Severity::Info));
        assert_eq!(Severity::from_wire("High"), Some(Severity::High));
        assert_eq!(Severity::from_wire("HIGH"), None);
        assert_eq!(Severity::from_wire("info"), None);
        assert_eq!(Severity::from_wire("Critical"), None);
    }

    #[test]
    fn severity_from_str_is_lenient() {
        assert_eq!("high".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!("Medium".parse::<Severity>().unwrap(), Severity::Medium);
        assert!("critical".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_rank_orders_high_first() {
        assert!(Severity::High.rank() < Severity::Medium.rank());
        assert!(Severity::Medium.rank() < Severity::Low.rank());
        assert!(Severity::Low.rank() < Severity::Info.rank());
    }

    #[test]
    fn finding_serializes_snake_case() {
        let finding = Finding {
            file: "a.rs".into(),
            line: 1,
            severity: Severity::Info,
            title: "t".into(),
            explanation: "e".into(),
            suggested_fix: "f".into(),
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert!(json.get("suggested_fix").is_some());
        assert_eq!(json["severity"], "Info");
    }

    #[test]
    fn fallback_has_empty_findings() {
        let result = ReviewResult::fallback("boom");
        assert_eq!(result.summary, "boom");
        assert!(result.findings.is_empty());
        assert!(!result.has_high_severity());
    }

    #[test]
    fn has_high_severity_detects_high() {
        let result = ReviewResult {
            summary: "s".into(),
            findings: vec![
                Finding {
                    file: "a.rs".into(),
                    line: 1,
                    severity: Severity::Low,
                    title: "t".into(),
                    explanation: "e".into(),
                    suggested_fix: "f".into(),
                },
                Finding {
                    file: "b.rs".into(),
                    line: 2,
                    severity: Severity::High,
                    title: "t".into(),
                    explanation: "e".into(),
                    suggested_fix: "f".into(),
                },
            ],
        };
        assert!(result.has_high_severity());
    }

    #[test]
    fn verdict_event_strings() {
        assert_eq!(Verdict::Approve.as_event(), "APPROVE");
        assert_eq!(Verdict::Comment.as_event(), "COMMENT");
        assert_eq!(Verdict::RequestChanges.as_event(), "REQUEST_CHANGES");
    }

    #[test]
    fn posting_mode_parse_is_total() {
        assert_eq!(PostingMode::parse("approve"), PostingMode::Approve);
        assert_eq!(PostingMode::parse("APPROVE"), PostingMode::Approve);
        assert_eq!(PostingMode::parse("comment"), PostingMode::Comment);
        assert_eq!(
            PostingMode::parse("request_changes"),
            PostingMode::RequestChangesOnHigh
        );
        assert_eq!(PostingMode::parse(""), PostingMode::Comment);
        assert_eq!(PostingMode::parse("nonsense"), PostingMode::Comment);
    }

    #[test]
    fn posting_mode_roundtrips_through_toml() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            event: PostingMode,
        }
        let wrapper: Wrapper = toml::from_str("event = \"request_changes\"").unwrap();
        assert_eq!(wrapper.event, PostingMode::RequestChangesOnHigh);

        let unknown: Wrapper = toml::from_str("event = \"mystery\"").unwrap();
        assert_eq!(unknown.event, PostingMode::Comment);
    }
}
