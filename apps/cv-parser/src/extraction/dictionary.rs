//! Dictionary-driven passes: technologies, spoken languages and certifications.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dates::{MAX_YEAR, MIN_YEAR};
use crate::extraction::section_map;
use crate::models::{Certification, Language, Skill, SkillLevel};
use crate::text::classifier::is_header;
use crate::text::lexicon::{
    has_any_phrase, technologies_in, token_string, CEFR_LEVELS, SKILL_LEVEL_INDICATORS,
    SPOKEN_LANGUAGES, TECHNOLOGIES,
};
use crate::text::{RawLine, SectionKind};

// ── skills ──────────────────────────────────────────────────────────────────

const SKILL_BASE_CONFIDENCE: f64 = 0.3;
const SKILL_CONFIDENCE_PER_HIT: f64 = 0.2;
const SKILL_MAX_CONFIDENCE: f64 = 0.9;
const WORK_SECTION_BONUS: u32 = 2;
const SKILLS_SECTION_BONUS: u32 = 1;

// ── languages ───────────────────────────────────────────────────────────────

const LANGUAGE_WITH_LEVEL_CONFIDENCE: f64 = 0.9;
const LANGUAGE_CONFIDENCE: f64 = 0.7;

// ── certifications ──────────────────────────────────────────────────────────

const ISSUER_CONFIDENCE: f64 = 0.9;
const GENERIC_CERT_CONFIDENCE: f64 = 0.6;
const GENERIC_CERT_MIN_CHARS: usize = 5;
const GENERIC_CERT_MAX_CHARS: usize = 120;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static ISSUER_RULES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("Amazon Web Services", r"(?i)\bAWS Certified[\w\- ]*"),
        ("Microsoft", r"(?i)\bMicrosoft Certified:?[\w\- ]*"),
        ("Oracle", r"(?i)\bOracle Certified[\w\- ]*"),
        ("Google Cloud", r"(?i)\bGoogle Cloud (?:Certified )?[\w\- ]*?(?:Engineer|Architect|Developer|Leader|Analyst)\b"),
        ("Scrum Alliance", r"(?i)\b(?:Certified Scrum ?Master|Certified Scrum Product Owner|CSM|CSPO)\b"),
        ("Scrum.org", r"(?i)\b(?:Professional Scrum (?:Master|Product Owner)(?: I{1,3})?|PSM I{1,3}|PSPO I{1,3})\b"),
        ("PMI", r"(?i)\b(?:PMP|CAPM|Project Management Professional)\b"),
        ("AXELOS", r"(?i)\bITIL(?: v?\d)?(?: Foundation)?\b"),
        ("CompTIA", r"(?i)\bCompTIA [A-Za-z+]+"),
        ("ISC2", r"(?i)\b(?:CISSP|CCSP)\b"),
        ("EC-Council", r"(?i)\b(?:CEH|Certified Ethical Hacker)\b"),
    ]
    .into_iter()
    .map(|(issuer, pattern)| (issuer, Regex::new(pattern).unwrap()))
    .collect()
});

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn level_near(lines: &[RawLine], pos: usize) -> SkillLevel {
    let lo = pos.saturating_sub(1);
    let hi = (pos + 1).min(lines.len().saturating_sub(1));
    let context: String = lines[lo..=hi]
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let tokens = token_string(&context);
    SKILL_LEVEL_INDICATORS
        .iter()
        .find(|(_, words)| has_any_phrase(&tokens, words))
        .map_or(SkillLevel::Na, |(level, _)| *level)
}

/// Every dictionary technology mentioned at least once, most confident first.
/// Mentions inside work or skills sections count extra.
pub fn extract_skills(lines: &[RawLine]) -> Vec<Skill> {
    if lines.is_empty() {
        return Vec::new();
    }
    let sections = section_map(lines);
    let mentions: Vec<Vec<&'static str>> = lines.iter().map(|l| technologies_in(&l.text)).collect();

    let mut seen: Vec<&str> = Vec::new();
    let mut skills = Vec::new();
    for (category, techs) in TECHNOLOGIES {
        for tech in techs.iter().copied() {
            if seen.contains(&tech) {
                continue;
            }
            seen.push(tech);

            let hits: Vec<usize> = mentions
                .iter()
                .enumerate()
                .filter(|(_, found)| found.contains(&tech))
                .map(|(pos, _)| pos)
                .collect();
            let Some(&first) = hits.first() else {
                continue;
            };

            let in_section = |kinds: &[SectionKind]| {
                hits.iter()
                    .any(|&pos| sections[pos].map_or(false, |k| kinds.contains(&k)))
            };
            let mut score = hits.len() as u32;
            if in_section(&[SectionKind::Experience, SectionKind::Projects]) {
                score += WORK_SECTION_BONUS;
            }
            if in_section(&[SectionKind::Skills]) {
                score += SKILLS_SECTION_BONUS;
            }
            let confidence = (SKILL_BASE_CONFIDENCE + SKILL_CONFIDENCE_PER_HIT * f64::from(score))
                .min(SKILL_MAX_CONFIDENCE);

            skills.push(Skill {
                name: tech.to_string(),
                category: category.to_string(),
                level: level_near(lines, first),
                confidence: round2(confidence),
            });
        }
    }
    skills.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    skills
}

/// Spoken languages, read from the languages section when there is one. A
/// level only applies to the comma-separated entry it appears in.
pub fn extract_languages(lines: &[RawLine]) -> Vec<Language> {
    let sections = section_map(lines);
    let in_languages: Vec<&RawLine> = lines
        .iter()
        .zip(&sections)
        .filter(|(_, kind)| **kind == Some(SectionKind::Languages))
        .map(|(line, _)| line)
        .collect();
    let scope: Vec<&RawLine> = if in_languages.is_empty() {
        lines.iter().collect()
    } else {
        in_languages
    };

    let mut out: Vec<Language> = Vec::new();
    for segment in scope.iter().flat_map(|l| l.text.split([',', ';', '|', '/'])) {
        let tokens = token_string(segment);
        for (aliases, name) in SPOKEN_LANGUAGES {
            if out.iter().any(|l| l.name == *name) || !has_any_phrase(&tokens, aliases) {
                continue;
            }
            let level = CEFR_LEVELS
                .iter()
                .find(|(_, words)| has_any_phrase(&tokens, words))
                .map(|(level, _)| level.to_string());
            let confidence = if level.is_some() {
                LANGUAGE_WITH_LEVEL_CONFIDENCE
            } else {
                LANGUAGE_CONFIDENCE
            };
            out.push(Language {
                name: name.to_string(),
                level_cefr: level,
                confidence,
            });
        }
    }
    out
}

fn year_in(text: &str) -> Option<i32> {
    YEAR_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .find(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
}

fn year_near(lines: &[RawLine], pos: usize) -> Option<i32> {
    year_in(&lines[pos].text).or_else(|| lines.get(pos + 1).and_then(|l| year_in(&l.text)))
}

fn clean_cert_name(raw: &str) -> String {
    let without_year = YEAR_RE.replace_all(raw, "");
    without_year
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, '-' | '–' | '|' | ',' | ':' | '(' | ')' | '•') || c.is_whitespace())
        .to_string()
}

fn push_unique(out: &mut Vec<Certification>, cert: Certification) {
    let key = cert.name.to_lowercase();
    if !cert.name.is_empty() && !out.iter().any(|c| c.name.to_lowercase() == key) {
        out.push(cert);
    }
}

/// Certifications from well-known issuers anywhere in the document, plus
/// plain lines listed under a certifications header.
pub fn extract_certifications(lines: &[RawLine]) -> Vec<Certification> {
    let sections = section_map(lines);
    let mut out = Vec::new();

    for (pos, line) in lines.iter().enumerate() {
        let mut matched = false;
        for (issuer, re) in ISSUER_RULES.iter() {
            for m in re.find_iter(&line.text) {
                matched = true;
                push_unique(
                    &mut out,
                    Certification {
                        name: clean_cert_name(m.as_str()),
                        issuer: Some(issuer.to_string()),
                        year: year_near(lines, pos),
                        confidence: ISSUER_CONFIDENCE,
                    },
                );
            }
        }

        let listed = sections[pos] == Some(SectionKind::Certifications);
        let chars = line.text.chars().count();
        if matched
            || !listed
            || is_header(&line.text)
            || !(GENERIC_CERT_MIN_CHARS..=GENERIC_CERT_MAX_CHARS).contains(&chars)
        {
            continue;
        }
        let name = clean_cert_name(&line.text);
        // A bare date line under the previous certificate.
        if !name.chars().any(char::is_alphabetic) {
            continue;
        }
        push_unique(
            &mut out,
            Certification {
                name,
                issuer: None,
                year: year_near(lines, pos),
                confidence: GENERIC_CERT_CONFIDENCE,
            },
        );
    }
    out
}
