//! Input truncation and response clean-up for assist calls.

use shelf_books::assist::{MAX_TAGS, MAX_TITLE_CHARS};

const ELLIPSIS: &str = "...";

/// Characters stripped, along with whitespace, from both ends of a heuristically extracted tag.
const TAG_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '-', '"', '\'', '[', ']', '(', ')', '{', '}', '*',
];

/// Lines shorter than this are tag candidates even when they contain spaces.
const SHORT_LINE_CHARS: usize = 30;

/// Cut `text` to at most `max_chars`, ending in `...` when anything was dropped.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Trim a generated title, drop wrapping quotes and enforce the length cap.
pub fn clean_title(raw: &str) -> String {
    let title = raw.trim();
    let title = title
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(title)
        .trim();
    truncate(title, MAX_TITLE_CHARS)
}

/// Extract tags from a model response.
///
/// A JSON string array is preferred, either as the whole response or embedded
/// in surrounding prose. Anything else goes through [`tags_from_lines`].
pub fn parse_tags(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let tags = structured_tags(raw).unwrap_or_else(|| tags_from_lines(raw));

    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .collect()
}

fn structured_tags(raw: &str) -> Option<Vec<String>> {
    if let Ok(tags) = serde_json::from_str::<Vec<String>>(raw) {
        return Some(tags);
    }
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Vec<String>>(&raw[start..=end]).ok()
}

/// Line classifier for free-form responses: a non-empty line is a tag if it
/// is short or has no whitespace.
pub fn tags_from_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && (line.chars().count() < SHORT_LINE_CHARS
                    || !line.chars().any(char::is_whitespace))
        })
        .map(|line| {
            line.trim_matches(|c: char| c.is_whitespace() || TAG_PUNCTUATION.contains(&c))
                .to_string()
        })
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn truncate_marks_dropped_text() {
        let out = truncate(&"a".repeat(3500), 3000);
        assert_eq!(out.chars().count(), 3000);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let out = truncate("積読積読積読", 5);
        assert_eq!(out, "積読...");
    }

    #[test]
    fn clean_title_caps_length() {
        let title = clean_title(&"x".repeat(150));
        assert_eq!(title.chars().count(), 100);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn clean_title_strips_quotes_and_whitespace() {
        assert_eq!(clean_title("  \"Async Rust in Practice\"\n"), "Async Rust in Practice");
        assert_eq!(clean_title("Plain"), "Plain");
    }

    #[test]
    fn parse_tags_prefers_json() {
        let tags = parse_tags(r#"["GraphQL", "API", "Tutorial"]"#);
        assert_eq!(tags, vec!["GraphQL", "API", "Tutorial"]);
    }

    #[test]
    fn parse_tags_finds_embedded_json() {
        let tags = parse_tags("Here you go:\n```json\n[\"rust\", \"tokio\"]\n```");
        assert_eq!(tags, vec!["rust", "tokio"]);
    }

    #[test]
    fn parse_tags_falls_back_to_lines() {
        let raw = "- rust\n- async programming\n\n* \"tokio\"\nThis line is a long explanation that should be skipped entirely";
        let tags = parse_tags(raw);
        assert_eq!(tags, vec!["rust", "async programming", "tokio"]);
    }

    #[test]
    fn parse_tags_keeps_long_single_words() {
        let word = "supercalifragilisticexpialidocious-extended";
        let tags = tags_from_lines(word);
        assert_eq!(tags, vec![word]);
    }

    #[test]
    fn parse_tags_caps_at_five() {
        let tags = parse_tags(r#"["a","b","c","d","e","f","g"]"#);
        assert_eq!(tags.len(), 5);
    }

    #[test]
    fn parse_tags_drops_blank_entries() {
        let tags = parse_tags(r#"["", " rust ", "  "]"#);
        assert_eq!(tags, vec!["rust"]);
    }
}
