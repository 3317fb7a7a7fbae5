//! Experience records, one per surviving date-range pivot.
//!
//! A pivot is dropped when its context says education or when its range
//! overlaps a reserved education range. Role and employer come from, in order:
//! a composite parse of the pivot remainder, a composite parse of the line
//! above, window scoring, and a known-company search further out. Each stage
//! only fills what the earlier ones left empty.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::config::ExtractionSettings;
use crate::dates::{find_date_range, DateMatch, DateRange};
use crate::extraction::nearest_section;
use crate::extraction::scoring::{
    clean_title, reject_reason, resolve_composite, resolve_window, CandidateLine, Resolution,
};
use crate::models::{EducationRecord, EmploymentType, ExperienceRecord};
use crate::text::classifier::{
    is_bullet_line, is_header, is_location_line, is_sentence_like, strip_bullet,
};
use crate::text::lexicon::{
    self, has_education_keyword, has_phrase, has_role_keyword, is_certification_line,
    token_string, EMPLOYMENT_TYPES,
};
use crate::text::RawLine;

pub const ROLE_WEIGHT: f64 = 0.4;
pub const COMPANY_WEIGHT: f64 = 0.5;
pub const DATE_WEIGHT: f64 = 0.1;

const MAX_ACHIEVEMENTS: usize = 10;
const MAX_TECH_STACK: usize = 8;
const MIN_TECH_CHARS: usize = 3;
const ACHIEVEMENT_MIN_CHARS: usize = 15;
const ACHIEVEMENT_MAX_CHARS: usize = 200;
const NEIGHBOUR_RADIUS: usize = 2;

// A line ending on one of these was cut mid-sentence by the layout.
const DANGLING_ENDINGS: &[&str] = &[
    "e", "de", "da", "do", "das", "dos", "em", "na", "no", "com", "para", "por", "que", "o", "a",
    "and", "of", "to", "the", "with", "for", "in",
];

struct Pivot {
    pos: usize,
    date: DateMatch,
}

/// Line positions outward from `pos`, nearest first, the line above before the
/// line below. A direction stops at another pivot or a header.
fn outward(lines: &[RawLine], pos: usize, radius: usize, pivots: &HashSet<usize>) -> Vec<usize> {
    let blocked = |i: usize| pivots.contains(&i) || is_header(&lines[i].text);
    let (mut up, mut down) = (true, true);
    let mut out = Vec::new();
    for distance in 1..=radius {
        if !(up || down) {
            break;
        }
        if up {
            match pos.checked_sub(distance) {
                Some(i) if !blocked(i) => out.push(i),
                _ => up = false,
            }
        }
        if down {
            match pos.checked_add(distance).filter(|i| *i < lines.len()) {
                Some(i) if !blocked(i) => out.push(i),
                _ => down = false,
            }
        }
    }
    out
}

// Only one of the two slots may hold a given text.
fn fill(resolution: &mut Resolution, found: Option<Resolution>) {
    let Some(found) = found else {
        return;
    };
    if resolution.role.is_none() {
        resolution.role = found.role.filter(|r| resolution.company.as_ref() != Some(r));
    }
    if resolution.company.is_none() {
        resolution.company = found.company.filter(|c| resolution.role.as_ref() != Some(c));
    }
}

fn is_education_context(lines: &[RawLine], pos: usize, settings: &ExtractionSettings) -> bool {
    let neighbour_says_education = [pos.checked_sub(1), Some(pos + 1)]
        .into_iter()
        .flatten()
        .filter_map(|i| lines.get(i))
        .any(|l| has_education_keyword(&l.text) && !has_role_keyword(&l.text));
    neighbour_says_education
        || nearest_section(lines, pos, settings.header_lookback)
            .map_or(false, |kind| kind.is_education_like())
}

fn overlapping_education<'a>(
    range: &DateRange,
    reserved: &'a [EducationRecord],
) -> Option<&'a EducationRecord> {
    reserved
        .iter()
        .find(|edu| edu.range.as_ref().map_or(false, |r| range.overlaps_reserved(r)))
}

// Window lines stop at pivots, headers, bullets and sentences: past those the
// text belongs to another job.
fn one_direction(
    lines: &[RawLine],
    positions: impl Iterator<Item = usize>,
    limit: usize,
    pivots: &HashSet<usize>,
) -> Vec<usize> {
    positions
        .take_while(|i| {
            let text = &lines[*i].text;
            !(pivots.contains(i) || is_header(text) || is_bullet_line(text) || is_sentence_like(text))
        })
        .take(limit)
        .collect()
}

fn candidate_window(
    lines: &[RawLine],
    pivot: &Pivot,
    remainder: &str,
    pivots: &HashSet<usize>,
    settings: &ExtractionSettings,
) -> Vec<CandidateLine> {
    let pos = pivot.pos;
    let above = one_direction(lines, (0..pos).rev(), settings.experience_window, pivots);
    let below = one_direction(lines, pos + 1..lines.len(), settings.experience_window, pivots);

    std::iter::once((pos, remainder))
        .chain(above.into_iter().map(|i| (i, lines[i].text.as_str())))
        .chain(below.into_iter().map(|i| (i, lines[i].text.as_str())))
        .filter_map(|(i, text)| CandidateLine::from_line(i, text))
        .collect()
}

fn known_company_nearby(
    lines: &[RawLine],
    pos: usize,
    pivots: &HashSet<usize>,
    settings: &ExtractionSettings,
) -> Option<String> {
    outward(lines, pos, settings.known_company_radius, pivots)
        .into_iter()
        .filter(|i| reject_reason(&lines[*i].text).is_none())
        .find_map(|i| {
            CandidateLine::from_line(i, &lines[i].text)?
                .known_company
                .map(str::to_string)
        })
}

fn resolve_pivot(
    lines: &[RawLine],
    pivot: &Pivot,
    remainder: &str,
    pivots: &HashSet<usize>,
    settings: &ExtractionSettings,
) -> Resolution {
    let mut resolution = Resolution::default();
    fill(&mut resolution, resolve_composite(remainder));

    if let Some(above) = pivot.pos.checked_sub(1) {
        if !pivots.contains(&above) && !is_header(&lines[above].text) {
            fill(&mut resolution, resolve_composite(&lines[above].text));
        }
    }

    if resolution.role.is_none() || resolution.company.is_none() {
        let window = candidate_window(lines, pivot, remainder, pivots, settings);
        fill(&mut resolution, Some(resolve_window(&window)));
    }

    if resolution.company.is_none() {
        let company = known_company_nearby(lines, pivot.pos, pivots, settings);
        fill(
            &mut resolution,
            Some(Resolution {
                role: None,
                company,
            }),
        );
    }
    resolution
}

pub(crate) fn clean_achievement(text: &str) -> Option<String> {
    let cleaned = strip_bullet(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if !(ACHIEVEMENT_MIN_CHARS..=ACHIEVEMENT_MAX_CHARS).contains(&cleaned.chars().count()) {
        return None;
    }
    let last = cleaned
        .split_whitespace()
        .last()
        .unwrap_or("")
        .to_lowercase();
    if DANGLING_ENDINGS.contains(&last.as_str()) {
        return None;
    }
    Some(cleaned)
}

fn achievements(block: &[RawLine]) -> Vec<String> {
    let mut seen = HashSet::new();
    block
        .iter()
        .filter(|l| is_bullet_line(&l.text) || is_sentence_like(&l.text))
        .filter_map(|l| clean_achievement(&l.text))
        .filter(|a| seen.insert(a.to_lowercase()))
        .take(MAX_ACHIEVEMENTS)
        .collect()
}

fn tech_stack<'a>(texts: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut stack: Vec<String> = Vec::new();
    for text in texts {
        for tech in lexicon::technologies_in(text) {
            if tech.chars().count() >= MIN_TECH_CHARS && !stack.iter().any(|t| t == tech) {
                stack.push(tech.to_string());
            }
        }
    }
    stack.truncate(MAX_TECH_STACK);
    stack
}

fn employment_type_in(text: &str) -> Option<EmploymentType> {
    let tokens = token_string(text);
    EMPLOYMENT_TYPES
        .iter()
        .find(|(phrase, _)| has_phrase(&tokens, phrase))
        .map(|(_, kind)| *kind)
}

fn build_record(
    lines: &[RawLine],
    pivot: &Pivot,
    remainder: &str,
    resolution: Resolution,
    pivots: &HashSet<usize>,
) -> ExperienceRecord {
    let mut confidence = DATE_WEIGHT;
    if resolution.role.is_some() {
        confidence += ROLE_WEIGHT;
    }
    if resolution.company.is_some() {
        confidence += COMPANY_WEIGHT;
    }

    let block_end = (pivot.pos + 1..lines.len())
        .find(|i| pivots.contains(i) || is_header(&lines[*i].text))
        .unwrap_or(lines.len());
    let block = &lines[pivot.pos + 1..block_end];
    let nearby = outward(lines, pivot.pos, NEIGHBOUR_RADIUS, pivots);

    let location = std::iter::once(remainder.to_string())
        .chain(nearby.iter().map(|i| lines[*i].text.clone()))
        .map(|text| clean_title(&text))
        .find(|text| is_location_line(text));

    let employment_type = std::iter::once(lines[pivot.pos].text.as_str())
        .chain(nearby.iter().map(|i| lines[*i].text.as_str()))
        .find_map(employment_type_in);

    let tech_texts = std::iter::once(remainder)
        .chain(nearby.iter().map(|i| lines[*i].text.as_str()))
        .chain(block.iter().map(|l| l.text.as_str()));

    ExperienceRecord {
        company: resolution.company,
        role: resolution.role,
        range: Some(pivot.date.range),
        confidence: confidence.min(1.0),
        location,
        employment_type,
        achievements: achievements(block),
        tech_stack: tech_stack(tech_texts),
        source_line: lines[pivot.pos].index,
    }
}

/// Experience records in source order. `reserved` holds the education records
/// whose ranges no experience may overlap.
pub fn extract_experiences(
    lines: &[RawLine],
    reserved: &[EducationRecord],
    settings: &ExtractionSettings,
) -> Vec<ExperienceRecord> {
    let pivots: Vec<Pivot> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !is_certification_line(&line.text))
        .filter_map(|(pos, line)| find_date_range(&line.text).map(|date| Pivot { pos, date }))
        .collect();
    let positions: HashSet<usize> = pivots.iter().map(|p| p.pos).collect();

    let mut records = Vec::new();
    for pivot in &pivots {
        let line = &lines[pivot.pos];
        if is_education_context(lines, pivot.pos, settings) {
            trace!("Pivot at line {} skipped: education context", line.index);
            continue;
        }
        if let Some(edu) = overlapping_education(&pivot.date.range, reserved) {
            trace!(
                "Pivot at line {} skipped: overlaps education {:?}",
                line.index,
                edu.institution
            );
            continue;
        }

        let remainder = pivot.date.remainder(&line.text);
        let resolution = resolve_pivot(lines, pivot, &remainder, &positions, settings);
        if resolution.is_empty() {
            trace!("Pivot at line {} dropped: no role or company", line.index);
            continue;
        }
        trace!(
            "Pivot at line {}: role={:?} company={:?}",
            line.index,
            resolution.role,
            resolution.company
        );
        records.push(build_record(lines, pivot, &remainder, resolution, &positions));
    }

    debug!(
        "Experience: {} pivots, {} records",
        pivots.len(),
        records.len()
    );
    records
}
