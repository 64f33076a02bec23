// promptscrub-core/src/normalize.rs
//! Cleans editor markup out of captured prompt text before detection.
//!
//! Rich-text prompt editors leave trailing-break `<br>` tags and empty
//! paragraphs in the captured text. They carry no content, but they do shift
//! offsets and can glue words together in detector output.

use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<br class="ProseMirror-trailingBreak">\s*"#).expect("valid regex"));

static EMPTY_PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<p>\s*</p>").expect("valid regex"));

/// Strips trailing-break tags, empty paragraphs and carriage returns, then
/// trims surrounding whitespace.
pub fn normalize_prompt(text: &str) -> String {
    let text = TRAILING_BREAK.replace_all(text, "");
    let text = EMPTY_PARAGRAPH.replace_all(&text, "");
    text.replace('\r', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_editor_markup() {
        let raw = "<p>Call me</p><p> </p><br class=\"ProseMirror-trailingBreak\">  \r\n";
        assert_eq!(normalize_prompt(raw), "<p>Call me</p>");
    }

    #[test]
    fn test_plain_text_only_trimmed() {
        assert_eq!(normalize_prompt("  hello\r\nworld  "), "hello\nworld");
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(normalize_prompt(" \r\n\t"), "");
    }
}
