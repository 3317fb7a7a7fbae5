//! Date-Range Resolver — recognizes heterogeneous date-range expressions and turns
//! them into `DateRange` values.
//!
//! A range is two date tokens joined by a dash-class separator. Tokens may be
//! `YYYY`, `YYYY-MM`, `MM-YYYY` (`/` and `.` also accepted), a month name in
//! Portuguese or English followed by a year, a three-letter abbreviation with an
//! optional period, or, on the right side only, an ongoing marker such as
//! `Present` or `Atual`.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dates::range::{DateRange, YearMonth};

/// Full month names, Portuguese and English.
const MONTH_NUMBERS: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
    ("janeiro", 1),
    ("fevereiro", 2),
    ("março", 3),
    ("marco", 3),
    ("abril", 4),
    ("maio", 5),
    ("junho", 6),
    ("julho", 7),
    ("agosto", 8),
    ("setembro", 9),
    ("outubro", 10),
    ("novembro", 11),
    ("dezembro", 12),
];

/// Abbreviations and the full name they stand for.
const MONTH_ABBREVIATIONS: &[(&str, &str)] = &[
    ("jan", "january"),
    ("feb", "february"),
    ("fev", "fevereiro"),
    ("mar", "march"),
    ("apr", "april"),
    ("abr", "abril"),
    ("mai", "maio"),
    ("jun", "june"),
    ("jul", "july"),
    ("aug", "august"),
    ("ago", "agosto"),
    ("sep", "september"),
    ("sept", "september"),
    ("set", "setembro"),
    ("oct", "october"),
    ("out", "outubro"),
    ("nov", "november"),
    ("dec", "december"),
    ("dez", "dezembro"),
];

/// Markers meaning "still ongoing".
const ONGOING_MARKERS: &[&str] = &[
    "present",
    "presente",
    "current",
    "currently",
    "now",
    "today",
    "atual",
    "atualmente",
    "hoje",
    "o momento",
    "momento",
];

const DASH_CLASS: &str = "[-–—‒―]+";

static MONTH_ALTERNATION: Lazy<String> = Lazy::new(|| {
    let mut names: Vec<&str> = MONTH_NUMBERS
        .iter()
        .map(|(name, _)| *name)
        .chain(MONTH_ABBREVIATIONS.iter().map(|(abbr, _)| *abbr))
        .collect();
    names.sort_by_key(|n| std::cmp::Reverse(n.chars().count()));
    names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|")
});

static DATE_TOKEN_PATTERN: Lazy<String> = Lazy::new(|| {
    format!(
        r"\b(?:(?:{months})\.?\s*(?:de\s+|/\s*)?\d{{4}}|\d{{1,2}}[/.\-]\d{{4}}|\d{{4}}[/.\-]\d{{1,2}}|\d{{4}})\b",
        months = MONTH_ALTERNATION.as_str()
    )
});

static ONGOING_PATTERN: Lazy<String> = Lazy::new(|| {
    let markers = ONGOING_MARKERS
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"\b(?:{markers})\b")
});

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    let token = DATE_TOKEN_PATTERN.as_str();
    Regex::new(&format!(
        r"(?i)(?P<start>{token})\s*{DASH_CLASS}\s*(?P<end>{ongoing}|{token})",
        ongoing = ONGOING_PATTERN.as_str()
    ))
    .unwrap()
});

static YEAR_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?P<start>\d{{4}})\s*{DASH_CLASS}\s*(?P<end>\d{{4}})\b"
    ))
    .unwrap()
});

static MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<month>\p{L}+)\.?\s*(?:de\s+|/\s*)?(?P<year>\d{4})$").unwrap()
});

static MONTH_FIRST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<month>\d{1,2})[/.\-](?P<year>\d{4})$").unwrap());

static YEAR_FIRST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<year>\d{4})[/.\-](?P<month>\d{1,2})$").unwrap());

static YEAR_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<year>\d{4})$").unwrap());

/// One side of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateToken {
    Month(YearMonth),
    Ongoing,
}

/// A valid range found in a line and the byte span it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub range: DateRange,
    pub span: Range<usize>,
}

impl DateMatch {
    /// The line with the matched range cut out.
    pub fn remainder(&self, line: &str) -> String {
        format!("{} {}", &line[..self.span.start], &line[self.span.end..])
    }
}

/// Month number for a full or abbreviated month name in either language.
pub fn resolve_month_name(word: &str) -> Option<u32> {
    let key = word.trim().trim_end_matches('.').to_lowercase();
    let full = MONTH_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == key)
        .map(|(_, full)| *full)
        .unwrap_or(key.as_str());
    MONTH_NUMBERS
        .iter()
        .find(|(name, _)| *name == full)
        .map(|(_, number)| *number)
}

fn year_month(year: &str, month: u32) -> Option<YearMonth> {
    YearMonth::new(year.parse().ok()?, month)
}

/// Parses one date token. Out-of-range years or months make the token invalid.
pub fn parse_date_token(token: &str) -> Option<DateToken> {
    let token = token.trim();
    let lower = token.to_lowercase();
    if ONGOING_MARKERS.contains(&lower.as_str()) {
        return Some(DateToken::Ongoing);
    }
    if let Some(caps) = MONTH_YEAR_RE.captures(token) {
        let month = resolve_month_name(&caps["month"])?;
        return year_month(&caps["year"], month).map(DateToken::Month);
    }
    let numeric = MONTH_FIRST_RE
        .captures(token)
        .or_else(|| YEAR_FIRST_RE.captures(token));
    if let Some(caps) = numeric {
        let month: u32 = caps["month"].parse().ok()?;
        return year_month(&caps["year"], month).map(DateToken::Month);
    }
    if let Some(caps) = YEAR_ONLY_RE.captures(token) {
        return year_month(&caps["year"], 1).map(DateToken::Month);
    }
    None
}

fn build_range(start: &str, end: &str) -> Option<DateRange> {
    let start = match parse_date_token(start)? {
        DateToken::Month(ym) => ym,
        DateToken::Ongoing => return None,
    };
    match parse_date_token(end)? {
        DateToken::Month(end) => DateRange::new(Some(start), Some(end), false),
        DateToken::Ongoing => DateRange::new(Some(start), None, true),
    }
}

/// First valid date range in `line`. Candidates with an invalid token or a
/// reversed order are skipped.
pub fn find_date_range(line: &str) -> Option<DateMatch> {
    RANGE_RE.captures_iter(line).find_map(|caps| {
        let whole = caps.get(0)?;
        let range = build_range(&caps["start"], &caps["end"])?;
        Some(DateMatch {
            range,
            span: whole.range(),
        })
    })
}

pub fn parse_date_range(text: &str) -> Option<DateRange> {
    find_date_range(text).map(|m| m.range)
}

pub fn contains_date_range(line: &str) -> bool {
    find_date_range(line).is_some()
}

/// Strict `YYYY–YYYY` range, both years resolved to January.
pub fn find_year_range(line: &str) -> Option<DateMatch> {
    YEAR_RANGE_RE.captures_iter(line).find_map(|caps| {
        let whole = caps.get(0)?;
        let start = year_month(&caps["start"], 1)?;
        let end = year_month(&caps["end"], 1)?;
        let range = DateRange::new(Some(start), Some(end), false)?;
        Some(DateMatch {
            range,
            span: whole.range(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_month_name_with_present() {
        let range = parse_date_range("January 2020 - Present").unwrap();
        assert_eq!(range.start, Some(ym(2020, 1)));
        assert_eq!(range.end, None);
        assert!(range.is_current);
    }

    #[test]
    fn test_portuguese_month_names_and_atual() {
        let range = parse_date_range("Março de 2015 – Atual").unwrap();
        assert_eq!(range.start, Some(ym(2015, 3)));
        assert!(range.is_current);

        let range = parse_date_range("agosto 2013 — novembro 2019").unwrap();
        assert_eq!(range.start, Some(ym(2013, 8)));
        assert_eq!(range.end, Some(ym(2019, 11)));
    }

    #[test]
    fn test_abbreviations_with_period() {
        let range = parse_date_range("Ago. 2013 - Mar. 2015").unwrap();
        assert_eq!(range.start, Some(ym(2013, 8)));
        assert_eq!(range.end, Some(ym(2015, 3)));

        let range = parse_date_range("Software Architect @ Paytrack (Nov 2020 - Present)").unwrap();
        assert_eq!(range.start, Some(ym(2020, 11)));
        assert!(range.is_current);
    }

    #[test]
    fn test_numeric_forms() {
        let range = parse_date_range("03/2015 - 11/2019").unwrap();
        assert_eq!((range.start, range.end), (Some(ym(2015, 3)), Some(ym(2019, 11))));

        let range = parse_date_range("2019-12 – 2020-03").unwrap();
        assert_eq!((range.start, range.end), (Some(ym(2019, 12)), Some(ym(2020, 3))));

        let range = parse_date_range("2010-2014").unwrap();
        assert_eq!((range.start, range.end), (Some(ym(2010, 1)), Some(ym(2014, 1))));
    }

    #[test]
    fn test_out_of_range_year_invalidates_token() {
        assert!(parse_date_range("1960 - 1965").is_none());
        assert!(parse_date_range("2030 - 2040").is_none());
        assert!(parse_date_range("13/2015 - 11/2019").is_none());
    }

    #[test]
    fn test_reversed_range_is_no_match() {
        assert!(parse_date_range("2020 - 2018").is_none());
        assert!(parse_date_range("Dec 2020 - Jan 2020").is_none());
    }

    #[test]
    fn test_ongoing_marker_only_on_right() {
        assert!(parse_date_range("Present - 2020").is_none());
    }

    #[test]
    fn test_non_month_word_before_year_is_ignored() {
        let m = find_date_range("Engineer 2020 - 2021").unwrap();
        assert_eq!(m.range.start, Some(ym(2020, 1)));
        assert_eq!(&"Engineer 2020 - 2021"[m.span.clone()], "2020 - 2021");
    }

    #[test]
    fn test_remainder_cuts_range() {
        let line = "Universidade Federal — 2010-2014";
        let m = find_date_range(line).unwrap();
        assert_eq!(m.remainder(line).trim(), "Universidade Federal —");
    }

    #[test]
    fn test_year_range_is_strict() {
        assert!(find_year_range("Bachelor 2010 – 2014").is_some());
        assert!(find_year_range("Jan 2010 - Present").is_none());
        assert!(find_year_range("03/2015 - 11/2019").is_none());
    }

    #[test]
    fn test_resolve_month_name_tables() {
        assert_eq!(resolve_month_name("Sept."), Some(9));
        assert_eq!(resolve_month_name("dez"), Some(12));
        assert_eq!(resolve_month_name("MAIO"), Some(5));
        assert_eq!(resolve_month_name("Engineer"), None);
    }

    #[test]
    fn test_parse_date_token_forms() {
        assert_eq!(parse_date_token("Atualmente"), Some(DateToken::Ongoing));
        assert_eq!(parse_date_token("2020"), Some(DateToken::Month(ym(2020, 1))));
        assert_eq!(parse_date_token("jan/2021"), Some(DateToken::Month(ym(2021, 1))));
        assert_eq!(parse_date_token("2021.07"), Some(DateToken::Month(ym(2021, 7))));
        assert_eq!(parse_date_token("2021-00"), None);
    }

    proptest! {
        #[test]
        fn prop_ordered_year_month_pairs_resolve(
            sy in 1970i32..=2035, sm in 1u32..=12,
            ey in 1970i32..=2035, em in 1u32..=12,
        ) {
            let start = ym(sy, sm);
            let end = ym(ey, em);
            let rendered = format!("{start} - {end}");
            let parsed = parse_date_range(&rendered);
            if end >= start {
                prop_assert_eq!(parsed, Some(DateRange { start: Some(start), end: Some(end), is_current: false }));
            } else {
                prop_assert_eq!(parsed, None);
            }
        }

        #[test]
        fn prop_slash_month_first_pairs_resolve(
            sy in 1970i32..=2035, sm in 1u32..=12, span in 0i32..120,
        ) {
            let start = ym(sy, sm);
            let end_ordinal = (start.ordinal() + span).min(2035 * 12 + 12);
            let end = ym((end_ordinal - 1) / 12, ((end_ordinal - 1) % 12 + 1) as u32);
            let rendered = format!("{:02}/{} – {:02}/{}", start.month, start.year, end.month, end.year);
            let parsed = parse_date_range(&rendered).unwrap();
            prop_assert_eq!(parsed.start, Some(start));
            prop_assert_eq!(parsed.end, Some(end));
        }
    }
}
