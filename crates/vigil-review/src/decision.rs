//! Derive the posting verdict and the pipeline-failure signal from a review.

use vigil_core::{PostingMode, ReviewResult, Verdict};

/// Outcome of the decision engine: what to tell the host, and independently
/// whether the invoking automation should halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Review event to publish.
    pub verdict: Verdict,
    /// Whether the CI pipeline should exit non-zero.
    pub fail_pipeline: bool,
}

/// Map a review result and posting mode to a [`Decision`]. Total over its
/// inputs — there is no failure mode.
///
/// `fail_pipeline` is computed independently of the verdict: it is true only
/// when `fail_on_high` is set and the result contains a High-severity
/// finding, regardless of the mode.
///
/// # Examples
///
/// ```
/// use vigil_core::{PostingMode, ReviewResult, Verdict};
/// use vigil_review::decision::decide;
///
/// let clean = ReviewResult { summary: "ok".into(), findings: vec![] };
/// let decision = decide(&clean, PostingMode::Comment, true);
/// assert_eq!(decision.verdict, Verdict::Comment);
/// assert!(!decision.fail_pipeline);
/// ```
pub fn decide(result: &ReviewResult, mode: PostingMode, fail_on_high: bool) -> Decision {
    let has_high = result.has_high_severity();

    let verdict = match mode {
        PostingMode::Approve => Verdict::Approve,
        PostingMode::Comment => Verdict::Comment,
        PostingMode::RequestChangesOnHigh => {
            if has_high {
                Verdict::RequestChanges
            } else {
                Verdict::Comment
            }
        }
    };

    Decision {
        verdict,
        fail_pipeline: fail_on_high && has_high,
    }
}
