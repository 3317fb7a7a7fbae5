use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::classifier::{header_section, is_header};
use crate::text::{RawLine, SectionKind};

const SUMMARY_MIN_CHARS: usize = 30;
const SUMMARY_MAX_CHARS: usize = 500;

static INLINE_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:summary|professional summary|resumo|resumo profissional|perfil|profile|about me|sobre mim|objetivo|objective)\s*:\s*(?P<body>\S.*)$")
        .unwrap()
});

fn collapse(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|p| p.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Free-text profile paragraph: the lines under a summary header up to the
/// next header, or the body of an inline `Summary: …` label.
pub fn extract_summary(lines: &[RawLine]) -> Option<String> {
    let mut body: Vec<&str> = Vec::new();

    if let Some(start) = lines
        .iter()
        .position(|l| header_section(&l.text) == Some(SectionKind::Summary))
    {
        body.extend(
            lines[start + 1..]
                .iter()
                .take_while(|l| !is_header(&l.text))
                .map(|l| l.text.as_str()),
        );
    } else if let Some((pos, caps)) = lines
        .iter()
        .enumerate()
        .find_map(|(i, l)| INLINE_LABEL_RE.captures(&l.text).map(|c| (i, c)))
    {
        body.push(caps.name("body").map_or("", |m| m.as_str()));
        body.extend(
            lines[pos + 1..]
                .iter()
                .take_while(|l| !is_header(&l.text))
                .map(|l| l.text.as_str()),
        );
    }

    let summary = collapse(&body);
    let chars = summary.chars().count();
    (SUMMARY_MIN_CHARS..=SUMMARY_MAX_CHARS)
        .contains(&chars)
        .then_some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::split_lines;

    #[test]
    fn test_summary_under_header_stops_at_next_header() {
        let lines = split_lines(
            "Maria Souza\nResumo\nDesenvolvedora backend com dez anos\nde experiência em sistemas distribuídos.\nExperiência\nAcme Corp",
        );
        assert_eq!(
            extract_summary(&lines).as_deref(),
            Some("Desenvolvedora backend com dez anos de experiência em sistemas distribuídos.")
        );
    }

    #[test]
    fn test_inline_label() {
        let lines = split_lines("Summary: Backend engineer focused on payments and observability.\nSkills\nJava");
        assert_eq!(
            extract_summary(&lines).as_deref(),
            Some("Backend engineer focused on payments and observability.")
        );
    }

    #[test]
    fn test_too_short_or_missing() {
        assert_eq!(extract_summary(&split_lines("Summary\nBackend dev\nSkills")), None);
        assert_eq!(extract_summary(&split_lines("Experience\nAcme Corp")), None);
    }

    #[test]
    fn test_overlong_summary_is_dropped() {
        let long = "word ".repeat(120);
        let lines = split_lines(&format!("Summary\n{long}"));
        assert_eq!(extract_summary(&lines), None);
    }
}
