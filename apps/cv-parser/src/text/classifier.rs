//! Line Classifier — pure predicates over a single normalized line.
//!
//! Every predicate is total: any string is a valid input and the answer is a plain
//! boolean. Role-ness and company-ness are scores, see `extraction::scoring`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::lexicon::{
    self, has_any_phrase, token_string, ACHIEVEMENT_VERBS, COMPANY_TYPE_TOKENS,
    CONNECTOR_WORDS, COUNTRY_TOKENS, HEADER_ALIASES_UPPER, LOCATION_KEYWORDS,
    SECTION_HEADERS, STATE_TOKENS,
};

/// Which résumé section a known header introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    Languages,
    Certifications,
    Courses,
    Projects,
    Summary,
    Contact,
    Awards,
    Other,
}

impl SectionKind {
    /// Sections whose date ranges belong to studies rather than jobs.
    pub fn is_education_like(self) -> bool {
        matches!(
            self,
            SectionKind::Education | SectionKind::Courses | SectionKind::Certifications
        )
    }
}

const SENTENCE_MIN_WORDS: usize = 10;
const SENTENCE_MIN_CONNECTORS: usize = 3;
const SKILL_LIST_MIN_TECHNOLOGIES: usize = 2;
const SKILL_LIST_MIN_COMMAS: usize = 2;
const LOCATION_KEYWORD_MIN_WORDS: usize = 2;
const LOCATION_KEYWORD_MAX_WORDS: usize = 5;

static LOCATION_SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    let mut places: Vec<&str> = STATE_TOKENS.iter().chain(COUNTRY_TOKENS).copied().collect();
    places.sort_by_key(|p| std::cmp::Reverse(p.len()));
    let alternation = places
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"^\p{{Lu}}[\p{{L}}'. \-]{{1,40}},\s*(?:{alternation})\b(?:\s*[,/\-–]\s*[\p{{L}} ]+)*\.?\s*$"
    ))
    .unwrap()
});

fn header_key(line: &str) -> String {
    line.trim().trim_end_matches(':').trim().to_lowercase()
}

/// Section kind of a known header phrase, if the line is one.
pub fn header_section(line: &str) -> Option<SectionKind> {
    let key = header_key(line);
    if let Some((_, kind)) = SECTION_HEADERS.iter().find(|(phrase, _)| *phrase == key) {
        return Some(*kind);
    }
    let upper = line.trim().trim_end_matches(':').trim().to_uppercase();
    HEADER_ALIASES_UPPER
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, kind)| *kind)
}

/// Known section phrase, all-caps alias, a line of at most two characters, or a
/// line ending with a colon.
pub fn is_header(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.chars().count() <= 2 || trimmed.ends_with(':') || header_section(trimmed).is_some()
}

pub fn word_count(line: &str) -> usize {
    line.split_whitespace().count()
}

/// `City, ST` / `City, Country` shape, or a short line with a location keyword.
pub fn is_location_line(line: &str) -> bool {
    let trimmed = line.trim();
    if LOCATION_SHAPE_RE.is_match(trimmed) {
        return true;
    }
    let words = word_count(trimmed);
    (LOCATION_KEYWORD_MIN_WORDS..=LOCATION_KEYWORD_MAX_WORDS).contains(&words)
        && has_any_phrase(&token_string(trimmed), LOCATION_KEYWORDS)
}

fn ends_with_sentence_period(trimmed: &str) -> bool {
    if !trimmed.ends_with('.') {
        return false;
    }
    // "Acme Inc." and "Senior Sistemas S.A." end with an abbreviation, not a sentence.
    let last = trimmed.split_whitespace().last().unwrap_or("");
    let bare = last.trim_end_matches('.').to_lowercase();
    !(bare.contains('.') || COMPANY_TYPE_TOKENS.contains(&bare.as_str()))
}

/// Any one of: ≥3 connectors, ≥10 words, a closing period, an achievement verb.
pub fn is_sentence_like(line: &str) -> bool {
    let trimmed = line.trim();
    if word_count(trimmed) >= SENTENCE_MIN_WORDS || ends_with_sentence_period(trimmed) {
        return true;
    }
    let tokens = token_string(trimmed);
    let connectors = tokens
        .split_whitespace()
        .filter(|t| CONNECTOR_WORDS.contains(t))
        .count();
    connectors >= SENTENCE_MIN_CONNECTORS || has_any_phrase(&tokens, ACHIEVEMENT_VERBS)
}

/// Two or more technologies, or an enumeration with two or more commas.
pub fn is_skill_list_line(line: &str) -> bool {
    lexicon::technologies_in(line).len() >= SKILL_LIST_MIN_TECHNOLOGIES
        || line.matches(',').count() >= SKILL_LIST_MIN_COMMAS
}

fn is_bullet_mark(c: char) -> bool {
    matches!(c, '-' | '•' | '·' | '–' | '—' | '*' | '▪' | '►' | '●' | '◦' | '>')
}

pub fn is_bullet_line(line: &str) -> bool {
    line.trim_start().chars().next().map_or(false, is_bullet_mark)
}

/// `line` without its leading bullet marks and indentation.
pub fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(|c: char| c.is_whitespace() || is_bullet_mark(c))
}

/// Two to four alphabetic words in upper case that are neither a header nor a
/// job title: the usual shape of a name printed as a banner.
pub fn is_all_caps_name(line: &str) -> bool {
    let trimmed = line.trim();
    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }
    let alphabetic = words.iter().all(|w| {
        w.chars()
            .all(|c| c.is_alphabetic() || matches!(c, '\'' | '.' | '-'))
    });
    alphabetic
        && trimmed.chars().any(|c| c.is_uppercase())
        && trimmed == trimmed.to_uppercase()
        && !is_header(trimmed)
        && !is_location_line(trimmed)
        && !lexicon::has_role_keyword(trimmed)
}
