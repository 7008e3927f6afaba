use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Javadoc tags with fixed meaning, not captured as annotations.
pub const STANDARD_JAVADOC_TAGS: [&str; 6] = ["param", "return", "throws", "see", "since", "author"];

static TAG_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@(\w+)\s+(.+)$").expect("valid doc tag regex"));

/// Custom `@Tag value` lines of a doc comment body. Later tags win.
pub fn parse_doc_tags(body: &str) -> BTreeMap<String, String> {
    body.lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter_map(|line| {
            let caps = TAG_LINE.captures(line)?;
            let tag = caps.get(1)?.as_str();
            if STANDARD_JAVADOC_TAGS.contains(&tag) {
                return None;
            }
            Some((tag.to_string(), caps.get(2)?.as_str().trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_doc_tags() {
        let tags = parse_doc_tags(
            "\n * Checks greeting.\n * @TestModule greeting\n *   @Purpose  verify output \n * @param name who\n",
        );
        assert_eq!(tags.len(), 2);
        assert_eq!(tags["TestModule"], "greeting");
        assert_eq!(tags["Purpose"], "verify output");
    }

    #[test]
    fn test_tag_without_value_is_ignored() {
        assert!(parse_doc_tags(" * @Deprecated\n").is_empty());
    }

    #[test]
    fn test_single_line_comment_body() {
        let tags = parse_doc_tags(" @TestModule stale ");
        assert_eq!(tags["TestModule"], "stale");
    }
}
