/// Strip the code fences a model sometimes wraps its JSON answer in.
///
/// Trims surrounding whitespace, removes a leading fence line (a tagged
/// opener such as "```json" or a bare "```"), removes a trailing "```", and
/// trims again. Pure and total; running it on its own output changes nothing.
///
/// # Examples
///
/// ```
/// use vigil_review::sanitize::sanitize;
///
/// assert_eq!(sanitize("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(sanitize("  {\"a\":1}  "), "{\"a\":1}");
/// ```
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.trim();

    if text.starts_with("```") {
        text = match text.find('\n') {
            Some(newline) => &text[newline + 1..],
            None => "",
        };
    }

    text = text.trim_end();
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped;
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_idempotent(input: &str) {
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once, "not idempotent for {input:?}");
    }

    #[test]
    fn strips_tagged_fence() {
        let fenced = "```json\n{\"summary\":\"ok\",\"findings\":[]}\n```";
        assert_eq!(sanitize(fenced), "{\"summary\":\"ok\",\"findings\":[]}");
        assert_idempotent(fenced);
    }

    #[test]
    fn strips_untagged_fence() {
        let fenced = "```\n{\"a\":1}\n```";
        assert_eq!(sanitize(fenced), "{\"a\":1}");
        assert_idempotent(fenced);
    }

    #[test]
    fn plain_text_is_untouched_except_trim() {
        assert_eq!(sanitize("  {\"a\":1}\n"), "{\"a\":1}");
        assert_eq!(sanitize("no fences here"), "no fences here");
        assert_idempotent("no fences here");
        assert_idempotent("  {\"a\":1}\n");
    }

    #[test]
    fn handles_fence_without_closing() {
        assert_eq!(sanitize("```json\n{\"a\":1}"), "{\"a\":1}");
        assert_idempotent("```json\n{\"a\":1}");
    }

    #[test]
    fn handles_empty_and_whitespace_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("   \n\t  "), "");
        assert_eq!(sanitize("```"), "");
        assert_idempotent("");
        assert_idempotent("   \n\t  ");
        assert_idempotent("```");
    }

    #[test]
    fn fence_with_windows_line_endings() {
        let fenced = "```json\r\n{\"a\":1}\r\n```";
        assert_eq!(sanitize(fenced), "{\"a\":1}");
        assert_idempotent(fenced);
    }
}
