//! Entity Scorer — decides whether a short line names a job title, an employer,
//! or neither.
//!
//! Every line is first reduced to a cleaned title form and rejected outright when
//! it cannot name anything (headers, locations, blacklisted phrases, symbol soup).
//! Surviving lines get two integer scores built from the weights below; each
//! score carries the list of rules that produced it so callers and tests can see
//! why a line won.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::classifier::{
    is_bullet_line, is_header, is_location_line, is_sentence_like, is_skill_list_line, word_count,
};
use crate::text::lexicon::{
    self, has_any_phrase, token_string, COMPANY_TYPE_TOKENS, ROLE_KEYWORDS, TITLE_BLACKLIST,
};

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

pub const ROLE_KEYWORD_BONUS: i32 = 3;
pub const ROLE_MULTI_WORD_BONUS: i32 = 1;
pub const ROLE_UPPERCASE_BONUS: i32 = 1;
pub const ROLE_SENTENCE_PENALTY: i32 = -3;

/// A known employer never doubles as a job title.
pub const KNOWN_COMPANY_ROLE_VETO: i32 = -10;
pub const LOCATION_VETO: i32 = -10;
pub const TECH_STACK_VETO: i32 = -8;

pub const KNOWN_COMPANY_OVERRIDE: i32 = 10;
pub const COMPANY_TYPE_BONUS: i32 = 2;
pub const COMPANY_CAPITALIZED_BONUS: i32 = 2;
pub const COMPANY_SHORT_NAME_BONUS: i32 = 1;
pub const COMPANY_ROLE_KEYWORD_PENALTY: i32 = -5;
pub const COMPANY_SKILL_LIST_PENALTY: i32 = -5;

pub const ROLE_ACCEPT_MIN: i32 = 2;
/// Composite segments and one-line windows.
pub const COMPANY_ACCEPT_MIN_SINGLE: i32 = 3;
/// Windows with more than one candidate.
pub const COMPANY_ACCEPT_MIN_WINDOW: i32 = 2;

const MIN_TITLE_CHARS: usize = 3;
const COMPANY_MAX_SHORT_WORDS: usize = 4;

static PARENTHETICAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)?").unwrap());

static SYMBOL_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[;:<>/|\\]{2,}").unwrap());

static COMPOSITE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:[@|–—]|\s-\s)\s*").unwrap());

// Separators of an enumeration: "Java, Spring", "Docker e Kubernetes", "Git / Jira".
static LIST_JOINER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:[,;/&+]|\band\b|\bor\b|\be\b|\bou\b)\s*").unwrap());

// ────────────────────────────────────────────────────────────────────────────
// Breakdown
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRule {
    RoleKeyword,
    MultiWord,
    Uppercase,
    SentenceLike,
    Location,
    KnownCompany,
    TechStack,
    CompanyType,
    Capitalized,
    ShortName,
    SkillList,
}

/// An integer score and the rules that produced it, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: i32,
    pub rules: Vec<(ScoreRule, i32)>,
}

impl ScoreBreakdown {
    fn vetoed(rule: ScoreRule, delta: i32) -> Self {
        Self {
            total: delta,
            rules: vec![(rule, delta)],
        }
    }

    fn apply(&mut self, rule: ScoreRule, delta: i32) {
        self.total += delta;
        self.rules.push((rule, delta));
    }

    pub fn applied(&self, rule: ScoreRule) -> bool {
        self.rules.iter().any(|(r, _)| *r == rule)
    }
}

/// Why a line was dropped before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Header,
    Location,
    Blacklisted,
    TooShort,
    TooSymbolic,
    Certification,
    Bullet,
}

// ────────────────────────────────────────────────────────────────────────────
// Cleaning and rejection
// ────────────────────────────────────────────────────────────────────────────

/// Strips leading/trailing punctuation and parenthetical content, collapses
/// whitespace. `C++` and `C#` keep their trailing symbols.
pub fn clean_title(line: &str) -> String {
    let without_parens = PARENTHETICAL_RE.replace_all(line, " ");
    let collapsed = without_parens.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#')))
        .to_string()
}

/// Reason the raw line cannot be a role or company candidate, if any.
pub fn reject_reason(line: &str) -> Option<RejectReason> {
    let raw = line.trim();
    if is_bullet_line(raw) {
        return Some(RejectReason::Bullet);
    }
    if is_header(raw) {
        return Some(RejectReason::Header);
    }
    let cleaned = clean_title(raw);
    if cleaned.chars().count() < MIN_TITLE_CHARS {
        return Some(RejectReason::TooShort);
    }
    if SYMBOL_RUN_RE.is_match(&cleaned) {
        return Some(RejectReason::TooSymbolic);
    }
    if is_header(&cleaned) {
        return Some(RejectReason::Header);
    }
    if TITLE_BLACKLIST.contains(&cleaned.to_lowercase().as_str()) {
        return Some(RejectReason::Blacklisted);
    }
    if is_location_line(&cleaned) {
        return Some(RejectReason::Location);
    }
    if lexicon::is_certification_line(&cleaned) {
        return Some(RejectReason::Certification);
    }
    None
}

// ────────────────────────────────────────────────────────────────────────────
// Scores
// ────────────────────────────────────────────────────────────────────────────

fn starts_uppercase(text: &str) -> bool {
    text.chars()
        .find(|c| c.is_alphabetic())
        .map(|c| c.is_uppercase())
        .unwrap_or(false)
}

/// Two or more technologies, or a technology enumerated next to anything else.
pub fn is_tech_stack_line(line: &str) -> bool {
    if lexicon::technologies_in(line).len() >= 2 {
        return true;
    }
    let segments: Vec<&str> = LIST_JOINER_RE
        .split(line)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    segments.len() >= 2
        && segments
            .iter()
            .any(|segment| !lexicon::technologies_in(segment).is_empty())
}

pub fn role_score(line: &str) -> ScoreBreakdown {
    if is_location_line(line) {
        return ScoreBreakdown::vetoed(ScoreRule::Location, LOCATION_VETO);
    }
    if lexicon::exact_known_company(line).is_some() {
        return ScoreBreakdown::vetoed(ScoreRule::KnownCompany, KNOWN_COMPANY_ROLE_VETO);
    }
    let mut score = ScoreBreakdown::default();
    if has_any_phrase(&token_string(line), ROLE_KEYWORDS) {
        score.apply(ScoreRule::RoleKeyword, ROLE_KEYWORD_BONUS);
    }
    if word_count(line) >= 2 {
        score.apply(ScoreRule::MultiWord, ROLE_MULTI_WORD_BONUS);
    }
    if starts_uppercase(line) {
        score.apply(ScoreRule::Uppercase, ROLE_UPPERCASE_BONUS);
    }
    if is_sentence_like(line) {
        score.apply(ScoreRule::SentenceLike, ROLE_SENTENCE_PENALTY);
    }
    score
}

pub fn company_score(line: &str) -> ScoreBreakdown {
    if is_location_line(line) {
        return ScoreBreakdown::vetoed(ScoreRule::Location, LOCATION_VETO);
    }
    if is_tech_stack_line(line) {
        return ScoreBreakdown::vetoed(ScoreRule::TechStack, TECH_STACK_VETO);
    }
    let tokens = token_string(line);
    // "Oracle DBA" is a title that mentions an employer.
    let names_employer = lexicon::exact_known_company(line).is_some()
        || (lexicon::known_company(line).is_some() && !has_any_phrase(&tokens, ROLE_KEYWORDS));
    if names_employer {
        return ScoreBreakdown::vetoed(ScoreRule::KnownCompany, KNOWN_COMPANY_OVERRIDE);
    }

    let mut score = ScoreBreakdown::default();
    if has_any_phrase(&tokens, COMPANY_TYPE_TOKENS) {
        score.apply(ScoreRule::CompanyType, COMPANY_TYPE_BONUS);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let capitalized = words.iter().filter(|w| starts_uppercase(w)).count();
    if capitalized >= words.len().saturating_sub(1).max(1) {
        score.apply(ScoreRule::Capitalized, COMPANY_CAPITALIZED_BONUS);
    }
    if (1..=COMPANY_MAX_SHORT_WORDS).contains(&words.len()) {
        score.apply(ScoreRule::ShortName, COMPANY_SHORT_NAME_BONUS);
    }
    if has_any_phrase(&tokens, ROLE_KEYWORDS) {
        score.apply(ScoreRule::RoleKeyword, COMPANY_ROLE_KEYWORD_PENALTY);
    }
    if is_skill_list_line(line) {
        score.apply(ScoreRule::SkillList, COMPANY_SKILL_LIST_PENALTY);
    }
    score
}

// ────────────────────────────────────────────────────────────────────────────
// Candidates and resolution
// ────────────────────────────────────────────────────────────────────────────

/// A cleaned line inside one candidate window, with both scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLine {
    pub index: usize,
    pub text: String,
    pub role: ScoreBreakdown,
    pub company: ScoreBreakdown,
    pub known_company: Option<&'static str>,
    pub is_location: bool,
    pub is_header: bool,
    pub is_sentence: bool,
    pub is_skill_list: bool,
}

impl CandidateLine {
    /// `None` when the line is rejected or cleans down to nothing.
    pub fn from_line(index: usize, line: &str) -> Option<Self> {
        if reject_reason(line).is_some() {
            return None;
        }
        let text = clean_title(line);
        let company = company_score(&text);
        // A vetoed line keeps its veto even when it names a known employer.
        let known_company = if company.applied(ScoreRule::KnownCompany) {
            lexicon::known_company(&text)
        } else {
            None
        };
        Some(Self {
            index,
            role: role_score(&text),
            company,
            known_company,
            is_location: is_location_line(&text),
            is_header: is_header(&text),
            is_sentence: is_sentence_like(&text),
            is_skill_list: is_skill_list_line(&text),
            text,
        })
    }
}

/// Role and employer picked from one window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub role: Option<String>,
    pub company: Option<String>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.company.is_none()
    }
}

/// Known-company text is always reported under its canonical spelling.
pub fn canonical_company(text: &str) -> String {
    lexicon::known_company(text)
        .map(str::to_string)
        .unwrap_or_else(|| text.to_string())
}

// Highest score wins; ties keep the earlier candidate.
fn best_by<'a>(
    candidates: &'a [CandidateLine],
    score: impl Fn(&CandidateLine) -> i32,
) -> Option<&'a CandidateLine> {
    candidates.iter().fold(None, |best, candidate| match best {
        Some(b) if score(b) >= score(candidate) => Some(b),
        _ => Some(candidate),
    })
}

fn resolve(candidates: &[CandidateLine], company_min: i32) -> Resolution {
    let role = best_by(candidates, |c| c.role.total).filter(|c| c.role.total >= ROLE_ACCEPT_MIN);

    let company = candidates
        .iter()
        .find(|c| c.known_company.is_some())
        .or_else(|| best_by(candidates, |c| c.company.total).filter(|c| c.company.total >= company_min));

    let company = match (role, company) {
        (Some(r), Some(c)) if r.text == c.text => None,
        (_, c) => c,
    };

    Resolution {
        role: role.map(|c| c.text.clone()),
        company: company.map(|c| canonical_company(&c.text)),
    }
}

/// Non-empty pieces of a line split on `@`, `|`, an en/em dash or a spaced hyphen.
pub fn composite_segments(line: &str) -> Vec<&str> {
    COMPOSITE_SPLIT_RE
        .split(line)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Scores the segments of a line joined by `@`, `|`, an en/em dash or a spaced
/// hyphen. `None` when the line has fewer than two segments or nothing is accepted.
pub fn resolve_composite(line: &str) -> Option<Resolution> {
    let segments = composite_segments(line);
    if segments.len() < 2 {
        return None;
    }
    let candidates: Vec<CandidateLine> = segments
        .iter()
        .enumerate()
        .filter_map(|(i, segment)| CandidateLine::from_line(i, segment))
        .collect();
    let resolution = resolve(&candidates, COMPANY_ACCEPT_MIN_SINGLE);
    (!resolution.is_empty()).then_some(resolution)
}

/// Picks the employer (known company first, then best general score) and the
/// best role from a window already in priority order.
pub fn resolve_window(candidates: &[CandidateLine]) -> Resolution {
    let company_min = if candidates.len() > 1 {
        COMPANY_ACCEPT_MIN_WINDOW
    } else {
        COMPANY_ACCEPT_MIN_SINGLE
    };
    resolve(candidates, company_min)
}
