//! Education records.
//!
//! Pass 1 anchors on strict `YYYY–YYYY` lines and fills institution/degree from
//! the pivot remainder and its neighbours. Pass 2 picks up keyword lines pass 1
//! did not use and looks for the nearest range around them. Records are then
//! merged by `(start, end)` key.

use std::collections::HashSet;

use tracing::debug;

use crate::config::ExtractionSettings;
use crate::dates::{contains_date_range, find_date_range, find_year_range, DateRange};
use crate::extraction::nearest_section;
use crate::extraction::scoring::{clean_title, composite_segments};
use crate::models::EducationRecord;
use crate::text::classifier::{
    is_bullet_line, is_header, is_location_line, is_sentence_like, is_skill_list_line,
};
use crate::text::lexicon::{
    has_degree_keyword, has_education_keyword, has_institution_keyword, is_certification_line,
};
use crate::text::{RawLine, SectionKind};

pub const INSTITUTION_WEIGHT: f64 = 0.4;
pub const DEGREE_WEIGHT: f64 = 0.3;
pub const RANGE_WEIGHT: f64 = 0.3;

const MIN_SLOT_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Before,
    Pivot,
    After,
}

#[derive(Debug, Clone)]
struct SlotCandidate {
    text: String,
    position: Position,
    line: usize,
}

#[derive(Debug, Default)]
struct Slots {
    institution: Option<SlotCandidate>,
    degree: Option<SlotCandidate>,
}

impl Slots {
    fn is_empty(&self) -> bool {
        self.institution.is_none() && self.degree.is_none()
    }

    fn lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.institution
            .iter()
            .chain(self.degree.iter())
            .map(|c| c.line)
    }

    fn into_record(self, range: Option<DateRange>) -> EducationRecord {
        let mut confidence = 0.0;
        if self.institution.is_some() {
            confidence += INSTITUTION_WEIGHT;
        }
        if self.degree.is_some() {
            confidence += DEGREE_WEIGHT;
        }
        if range.is_some() {
            confidence += RANGE_WEIGHT;
        }
        EducationRecord {
            institution: self.institution.map(|c| c.text),
            degree: self.degree.map(|c| c.text),
            range,
            confidence: confidence.min(1.0),
        }
    }
}

fn usable_slot(text: &str) -> bool {
    if text.chars().count() < MIN_SLOT_CHARS
        || is_header(text)
        || is_location_line(text)
        || is_certification_line(text)
        || contains_date_range(text)
    {
        return false;
    }
    has_education_keyword(text) || !(is_sentence_like(text) || is_skill_list_line(text))
}

fn slot_candidates(text: &str, position: Position, line: usize) -> Vec<SlotCandidate> {
    if is_bullet_line(text) {
        return Vec::new();
    }
    composite_segments(text)
        .into_iter()
        .map(clean_title)
        .filter(|t| usable_slot(t))
        .map(|text| SlotCandidate {
            text,
            position,
            line,
        })
        .collect()
}

// Longest text wins; ties keep the earlier candidate.
fn longest<'a>(
    candidates: impl Iterator<Item = &'a SlotCandidate>,
) -> Option<&'a SlotCandidate> {
    candidates.fold(None, |best, c| match best {
        Some(b) if b.text.chars().count() >= c.text.chars().count() => Some(b),
        _ => Some(c),
    })
}

// Keyword matches claim their slot first. Without a keyword the line before the
// pivot (or the pivot itself) reads as the institution and the line after as the
// degree; a degree-position line carrying an institution keyword therefore lands
// in the institution slot.
fn assign_slots(candidates: &[SlotCandidate], positional: bool) -> Slots {
    let mut institution = longest(candidates.iter().filter(|c| has_institution_keyword(&c.text)));
    let mut degree = longest(candidates.iter().filter(|c| {
        has_degree_keyword(&c.text) && institution.map_or(true, |i| i.text != c.text)
    }));

    if positional {
        let keywordless = |c: &&SlotCandidate| !has_education_keyword(&c.text);
        if institution.is_none() {
            let free = |c: &&SlotCandidate| degree.map_or(true, |d| d.text != c.text);
            institution = longest(
                candidates
                    .iter()
                    .filter(keywordless)
                    .filter(free)
                    .filter(|c| c.position != Position::After),
            )
            .or_else(|| longest(candidates.iter().filter(keywordless).filter(free)));
        }
        if degree.is_none() {
            let free = |c: &&SlotCandidate| institution.map_or(true, |i| i.text != c.text);
            degree = longest(
                candidates
                    .iter()
                    .filter(keywordless)
                    .filter(free)
                    .filter(|c| c.position == Position::After),
            )
            .or_else(|| longest(candidates.iter().filter(keywordless).filter(free)));
        }
    }

    Slots {
        institution: institution.cloned(),
        degree: degree.cloned(),
    }
}

// A range under an experience header without a degree word is a job at a school.
fn looks_like_job_context(
    lines: &[RawLine],
    pos: usize,
    candidates: &[SlotCandidate],
    settings: &ExtractionSettings,
) -> bool {
    nearest_section(lines, pos, settings.header_lookback) == Some(SectionKind::Experience)
        && !candidates.iter().any(|c| has_degree_keyword(&c.text))
}

// Lines within `radius` of `pos` in source order. A header closes the window
// in its direction: what lies past it belongs to another section.
fn window_candidates(lines: &[RawLine], pos: usize, radius: usize, keyword_only: bool) -> Vec<SlotCandidate> {
    let open = |i: &usize| !is_header(&lines[*i].text);
    let mut above: Vec<usize> = (1..=radius)
        .map_while(|d| pos.checked_sub(d))
        .take_while(open)
        .collect();
    above.reverse();
    let below = (1..=radius)
        .map_while(|d| pos.checked_add(d).filter(|i| *i < lines.len()))
        .take_while(open);

    let mut out = Vec::new();
    for i in above.into_iter().chain(below) {
        let text = &lines[i].text;
        if keyword_only && !has_education_keyword(text) {
            continue;
        }
        let position = if i < pos { Position::Before } else { Position::After };
        out.extend(slot_candidates(text, position, i));
    }
    out
}

fn first_pass(
    lines: &[RawLine],
    settings: &ExtractionSettings,
    covered: &mut HashSet<usize>,
) -> Vec<EducationRecord> {
    let mut records = Vec::new();
    for (pos, line) in lines.iter().enumerate() {
        if is_certification_line(&line.text) {
            continue;
        }
        let Some(pivot) = find_year_range(&line.text) else {
            continue;
        };

        let mut candidates = slot_candidates(&pivot.remainder(&line.text), Position::Pivot, pos);
        candidates.extend(window_candidates(lines, pos, settings.education_context, false));

        if !candidates.iter().any(|c| has_education_keyword(&c.text)) {
            continue;
        }
        if looks_like_job_context(lines, pos, &candidates, settings) {
            continue;
        }

        let slots = assign_slots(&candidates, true);
        if slots.is_empty() {
            continue;
        }
        covered.insert(pos);
        covered.extend(slots.lines());
        records.push(slots.into_record(Some(pivot.range)));
    }
    records
}

// Nearest range at or around `pos`; a header stops the scan in its direction.
fn nearest_range(lines: &[RawLine], pos: usize, radius: usize) -> Option<DateRange> {
    if let Some(m) = find_date_range(&lines[pos].text) {
        return Some(m.range);
    }
    let (mut up, mut down) = (true, true);
    for distance in 1..=radius {
        if !(up || down) {
            break;
        }
        if up {
            match pos.checked_sub(distance).map(|i| &lines[i].text) {
                Some(text) if is_header(text) => up = false,
                Some(text) => {
                    if let Some(m) = find_date_range(text) {
                        return Some(m.range);
                    }
                }
                None => up = false,
            }
        }
        if down {
            match pos.checked_add(distance).and_then(|i| lines.get(i)).map(|l| &l.text) {
                Some(text) if is_header(text) => down = false,
                Some(text) => {
                    if let Some(m) = find_date_range(text) {
                        return Some(m.range);
                    }
                }
                None => down = false,
            }
        }
    }
    None
}

fn second_pass(
    lines: &[RawLine],
    settings: &ExtractionSettings,
    covered: &mut HashSet<usize>,
) -> Vec<EducationRecord> {
    let mut records = Vec::new();
    for (pos, line) in lines.iter().enumerate() {
        let text = &line.text;
        if covered.contains(&pos)
            || !has_education_keyword(text)
            || is_certification_line(text)
            || is_header(text)
            || is_bullet_line(text)
        {
            continue;
        }

        let mut candidates = slot_candidates(text, Position::Pivot, pos);
        candidates.extend(
            window_candidates(lines, pos, 1, true)
                .into_iter()
                .filter(|c| !covered.contains(&c.line)),
        );
        if looks_like_job_context(lines, pos, &candidates, settings) {
            continue;
        }

        let slots = assign_slots(&candidates, false);
        if slots.is_empty() {
            continue;
        }
        covered.insert(pos);
        covered.extend(slots.lines());
        let range = nearest_range(lines, pos, settings.education_fallback_radius);
        records.push(slots.into_record(range));
    }
    records
}

/// Merges records sharing a `(start, end)` key: the first seen keeps its
/// fields, empty slots are filled from later ones, confidence is the max.
/// Rangeless records only collapse with exact duplicates.
pub fn merge_education(records: Vec<EducationRecord>) -> Vec<EducationRecord> {
    let mut merged: Vec<EducationRecord> = Vec::new();
    for record in records {
        let existing = match record.range {
            Some(range) => merged
                .iter_mut()
                .find(|m| m.range.map(|r| r.key()) == Some(range.key())),
            None => merged.iter_mut().find(|m| {
                m.range.is_none() && m.institution == record.institution && m.degree == record.degree
            }),
        };
        match existing {
            Some(existing) => existing.absorb(record),
            None => merged.push(record),
        }
    }
    merged
}

pub fn extract_education(lines: &[RawLine], settings: &ExtractionSettings) -> Vec<EducationRecord> {
    let mut covered = HashSet::new();
    let mut records = first_pass(lines, settings, &mut covered);
    let anchored = records.len();
    records.extend(second_pass(lines, settings, &mut covered));
    let found = records.len();
    let merged = merge_education(records);
    debug!(
        "Education: {anchored} range-anchored, {} keyword-only, {} after merge",
        found - anchored,
        merged.len()
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::YearMonth;
    use crate::text::split_lines;

    fn extract(text: &str) -> Vec<EducationRecord> {
        extract_education(&split_lines(text), &ExtractionSettings::default())
    }

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn record(
        institution: Option<&str>,
        degree: Option<&str>,
        range: Option<DateRange>,
        confidence: f64,
    ) -> EducationRecord {
        EducationRecord {
            institution: institution.map(String::from),
            degree: degree.map(String::from),
            range,
            confidence,
        }
    }

    #[test]
    fn test_pivot_remainder_and_following_degree() {
        let records = extract("Universidade Federal — 2010-2014\nBachelor in Computer Science");
        assert_eq!(records.len(), 1);
        let edu = &records[0];
        assert_eq!(edu.institution.as_deref(), Some("Universidade Federal"));
        assert_eq!(edu.degree.as_deref(), Some("Bachelor in Computer Science"));
        let range = edu.range.unwrap();
        assert_eq!(range.start, Some(ym(2010, 1)));
        assert_eq!(range.end, Some(ym(2014, 1)));
    }

    #[test]
    fn test_positional_fallback_before_and_after() {
        let records = extract("Formação Acadêmica\nPUC Minas\n2012 - 2016\nCiência da Computação");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].institution.as_deref(), Some("PUC Minas"));
        assert_eq!(records[0].degree.as_deref(), Some("Ciência da Computação"));
    }

    #[test]
    fn test_institution_keyword_after_pivot_claims_institution() {
        let records = extract("Education\nComputer Science\n2009 - 2013\nUniversity of Porto");
        assert_eq!(records[0].institution.as_deref(), Some("University of Porto"));
        assert_eq!(records[0].degree.as_deref(), Some("Computer Science"));
    }

    #[test]
    fn test_composite_pivot_line() {
        let records = extract("Bacharelado em Sistemas de Informação - FURB 2010 - 2014");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].institution.as_deref(), Some("FURB"));
        assert_eq!(
            records[0].degree.as_deref(),
            Some("Bacharelado em Sistemas de Informação")
        );
    }

    #[test]
    fn test_year_range_without_education_keyword_is_ignored() {
        assert!(extract("Acme Corp\nBackend Developer\n2015 - 2018").is_empty());
    }

    #[test]
    fn test_certification_pivot_is_skipped() {
        let records = extract("AWS Certified Developer 2019 - 2022");
        assert!(records.is_empty());
    }

    #[test]
    fn test_keyword_line_finds_nearby_range() {
        let records = extract("Education\nMBA em Gestão de Projetos\nFGV\nMar 2018 - Dez 2019");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].degree.as_deref(), Some("MBA em Gestão de Projetos"));
        let range = records[0].range.unwrap();
        assert_eq!(range.start, Some(ym(2018, 3)));
        assert_eq!(range.end, Some(ym(2019, 12)));
    }

    #[test]
    fn test_keyword_line_without_range() {
        let records = extract("Education\nUniversidade de São Paulo");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].range, None);
        assert_eq!(records[0].confidence, INSTITUTION_WEIGHT);
    }

    #[test]
    fn test_range_scan_stops_at_header() {
        let records = extract("Universidade de São Paulo\nExperience\nAcme Corp\nJan 2019 - Present");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].range, None);
    }

    #[test]
    fn test_context_window_stops_at_section_header() {
        let text = "Developer\nAcme Corp\n2015 - 2018\nEducation\nUniversidade Federal\n2010 - 2014";
        let records = extract(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].institution.as_deref(), Some("Universidade Federal"));
        assert_eq!(records[0].degree, None);
        assert_eq!(records[0].range.unwrap().start, Some(ym(2010, 1)));
    }

    #[test]
    fn test_unbounded_radius_stops_at_document_edges() {
        let lines = split_lines("Universidade Federal\n2010 - 2014\nBachelor in Computer Science");
        let candidates = window_candidates(&lines, 1, usize::MAX, false);
        assert_eq!(candidates.len(), 2);
        assert_eq!(nearest_range(&lines, 0, usize::MAX).and_then(|r| r.start), Some(ym(2010, 1)));

        let settings = ExtractionSettings {
            education_context: usize::MAX,
            education_fallback_radius: usize::MAX,
            ..ExtractionSettings::default()
        };
        assert_eq!(extract_education(&lines, &settings).len(), 1);
    }

    #[test]
    fn test_job_at_university_under_experience_header() {
        let records = extract("Experience\nProfessor\nUniversidade Federal\n2015 - 2018");
        assert!(records.is_empty());
    }

    #[test]
    fn test_merge_by_key_combines_complementary_fields() {
        let range = DateRange::new(Some(ym(2010, 1)), Some(ym(2014, 1)), false);
        let merged = merge_education(vec![
            record(Some("Universidade Federal"), None, range, 0.7),
            record(None, Some("Bachelor in Computer Science"), range, 0.6),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].institution.as_deref(), Some("Universidade Federal"));
        assert_eq!(merged[0].degree.as_deref(), Some("Bachelor in Computer Science"));
        assert_eq!(merged[0].confidence, 0.7);
    }

    #[test]
    fn test_merge_keeps_first_seen_fields() {
        let range = DateRange::new(Some(ym(2010, 1)), Some(ym(2014, 1)), false);
        let merged = merge_education(vec![
            record(Some("First"), None, range, 0.4),
            record(Some("Second"), None, range, 0.9),
        ]);
        assert_eq!(merged[0].institution.as_deref(), Some("First"));
        assert_eq!(merged[0].confidence, 0.9);
    }

    #[test]
    fn test_merge_rangeless_only_exact_duplicates() {
        let merged = merge_education(vec![
            record(Some("FURB"), None, None, 0.4),
            record(None, Some("MBA"), None, 0.3),
            record(Some("FURB"), None, None, 0.5),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].confidence, 0.5);
    }
}
