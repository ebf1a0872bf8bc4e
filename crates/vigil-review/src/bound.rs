/// Marker appended to a truncated patch so both the model and anyone reading
/// logs can see content was cut.
pub const TRUNCATION_MARKER: &str = "\n\n... [patch truncated to fit the size limit]";

/// Clamp a patch to `max_bytes` of UTF-8, appending [`TRUNCATION_MARKER`]
/// when content was cut.
///
/// Byte length is measured on the UTF-8 encoding, not the character count.
/// A patch within budget is returned unchanged. An oversized patch is cut at
/// the largest character boundary at or below `max_bytes`, so the result
/// never exceeds `max_bytes` plus the marker's own length.
///
/// # Examples
///
/// ```
/// use vigil_review::bound::{bound, TRUNCATION_MARKER};
///
/// assert_eq!(bound("small diff", 1000), "small diff");
///
/// let clamped = bound("0123456789", 5);
/// assert!(clamped.starts_with("01234"));
/// assert!(clamped.ends_with(TRUNCATION_MARKER));
/// ```
pub fn bound(patch: &str, max_bytes: usize) -> String {
    if patch.len() <= max_bytes {
        return patch.to_string();
    }

    let mut end = max_bytes;
    while !patch.is_char_boundary(end) {
        end -= 1;
    }

    let mut clamped = String::with_capacity(end + TRUNCATION_MARKER.len());
    clamped.push_str(&patch[..end]);
    clamped.push_str(TRUNCATION_MARKER);
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_within_budget_is_unchanged() {
        let patch = "--- a/x\n+++ b/x\n@@ -1 +1 @@\n-old\n+new\n";
        assert_eq!(bound(patch, patch.len()), patch);
        assert_eq!(bound(patch, patch.len() + 1), patch);
        assert_eq!(bound("", 0), "");
    }

    #[test]
    fn oversized_patch_is_cut_and_marked() {
        let patch = "x".repeat(100);
        let clamped = bound(&patch, 10);
        assert!(clamped.starts_with(&"x".repeat(10)));
        assert!(clamped.ends_with(TRUNCATION_MARKER));
        assert!(clamped.len() <= 10 + TRUNCATION_MARKER.len());
    }

    #[test]
    fn cut_respects_utf8_boundaries() {
        // é is two bytes; cutting at byte 5 would split the second é.
        let patch = "aaéé bb".repeat(50);
        let clamped = bound(&patch, 5);
        assert!(clamped.ends_with(TRUNCATION_MARKER));
        let prefix = clamped.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert!(prefix.len() <= 5);
        assert!(patch.starts_with(prefix));
    }

    #[test]
    fn marker_may_exceed_tiny_budgets_but_never_by_more() {
        // The relaxed guarantee: the result can exceed the budget by at most
        // the marker's own length.
        let clamped = bound("0123456789", 5);
        assert!(clamped.len() <= 5 + TRUNCATION_MARKER.len());
    }

    #[test]
    fn zero_budget_leaves_only_the_marker() {
        let clamped = bound("abc", 0);
        assert_eq!(clamped, TRUNCATION_MARKER);
    }
}
