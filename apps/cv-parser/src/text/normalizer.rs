//! Normalizer — turns raw PDF-extracted text into a canonical line stream.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A cleaned, non-empty line and its position in the normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    pub index: usize,
    pub text: String,
}

/// Upper bound on rejoin passes; a URL wrapped over more lines than this is left alone.
const MAX_REJOIN_PASSES: usize = 4;

static GLUED_SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<pre>[\p{L}\p{N}])(?P<scheme>https?://)").unwrap());

static HORIZONTAL_WS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\x0B\x{00A0}\x{2000}-\x{200B}\x{202F}\x{3000}]+").unwrap());

static LINKEDIN_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?P<path>linkedin\.com/in/) ?\n ?").unwrap());

// A URL whose last character cannot end an address continues on the next line.
static WRAPPED_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?P<url>(?:https?://|www\.)\S*[/\-_.=?&#%]) ?\n ?(?P<rest>\S)").unwrap()
});

/// Rejoins wrapped URLs, collapses horizontal whitespace (line breaks are kept) and
/// splits URL schemes glued to the preceding word.
pub fn normalize_text(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace(['\r', '\x0C'], "\n");
    let text = GLUED_SCHEME_RE.replace_all(&text, "${pre} ${scheme}");
    let text = HORIZONTAL_WS_RE.replace_all(&text, " ");
    let text = LINKEDIN_BREAK_RE.replace_all(&text, "${path}");

    let mut text = text.into_owned();
    for _ in 0..MAX_REJOIN_PASSES {
        match WRAPPED_URL_RE.replace_all(&text, "${url}${rest}") {
            Cow::Borrowed(_) => break,
            Cow::Owned(joined) => text = joined,
        }
    }
    text
}

/// Trimmed, non-empty lines of already-normalized text.
pub fn split_lines(normalized: &str) -> Vec<RawLine> {
    normalized
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let text = line.trim();
            (!text.is_empty()).then(|| RawLine {
                index,
                text: text.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_horizontal_whitespace_keeps_newlines() {
        let out = normalize_text("Software   Architect\t\tLead\nAcme\u{00A0}\u{00A0}Corp");
        assert_eq!(out, "Software Architect Lead\nAcme Corp");
    }

    #[test]
    fn test_crlf_becomes_newline() {
        assert_eq!(normalize_text("a line\r\nnext\rlast"), "a line\nnext\nlast");
    }

    #[test]
    fn test_rejoins_wrapped_url() {
        let out = normalize_text("Portfolio: https://example.com/projects/\nmy-app\nExperience");
        assert_eq!(out, "Portfolio: https://example.com/projects/my-app\nExperience");
    }

    #[test]
    fn test_url_ending_cleanly_is_not_joined() {
        let out = normalize_text("https://github.com/jdoe\nExperience");
        assert_eq!(out, "https://github.com/jdoe\nExperience");
    }

    #[test]
    fn test_rejoins_linkedin_profile_break() {
        let out = normalize_text("linkedin.com/in/\njoao-silva-123");
        assert_eq!(out, "linkedin.com/in/joao-silva-123");
    }

    #[test]
    fn test_splits_glued_scheme() {
        let out = normalize_text("Githubhttps://github.com/jdoe");
        assert_eq!(out, "Github https://github.com/jdoe");
    }

    #[test]
    fn test_text_without_patterns_is_unchanged() {
        assert_eq!(normalize_text("Plain line\nAnother"), "Plain line\nAnother");
    }

    #[test]
    fn test_split_lines_drops_blank_and_keeps_index() {
        let lines = split_lines("  First \n\n   \nSecond");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], RawLine { index: 0, text: "First".into() });
        assert_eq!(lines[1], RawLine { index: 3, text: "Second".into() });
    }
}
