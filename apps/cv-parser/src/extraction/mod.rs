// Field extractors. Education runs before experience so its ranges can be
// reserved; contact, summary, dictionary and project matches are independent
// passes.

pub mod contact;
pub mod dictionary;
pub mod education;
pub mod experience;
pub mod projects;
pub mod scoring;
pub mod summary;

use crate::text::classifier::header_section;
use crate::text::{RawLine, SectionKind};

/// Section of the nearest known header at or above `pos`, at most `lookback`
/// lines back.
pub(crate) fn nearest_section(lines: &[RawLine], pos: usize, lookback: usize) -> Option<SectionKind> {
    if pos >= lines.len() {
        return None;
    }
    let start = pos.saturating_sub(lookback);
    lines[start..=pos]
        .iter()
        .rev()
        .find_map(|line| header_section(&line.text))
}

/// Section each line belongs to: the last known header above it, if any.
pub(crate) fn section_map(lines: &[RawLine]) -> Vec<Option<SectionKind>> {
    let mut current = None;
    lines
        .iter()
        .map(|line| {
            if let Some(kind) = header_section(&line.text) {
                current = Some(kind);
            }
            current
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::split_lines;

    #[test]
    fn test_nearest_section_respects_lookback() {
        let lines = split_lines("Education\nUniversidade Federal\nBachelor\nfiller\nfiller 2");
        assert_eq!(nearest_section(&lines, 2, 5), Some(SectionKind::Education));
        assert_eq!(nearest_section(&lines, 4, 2), None);
        assert_eq!(nearest_section(&lines, 40, 2), None);
    }

    #[test]
    fn test_section_map_follows_headers() {
        let lines = split_lines("Maria Silva\nExperience\nAcme Corp\nSkills\nJava");
        let map = section_map(&lines);
        assert_eq!(map[0], None);
        assert_eq!(map[2], Some(SectionKind::Experience));
        assert_eq!(map[4], Some(SectionKind::Skills));
    }
}
