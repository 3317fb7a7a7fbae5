//! Contact block: e-mails, phones, profile links, location and full name.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Candidate, CandidateLinks, CandidateLocation};
use crate::text::classifier::{is_all_caps_name, is_header, is_location_line};
use crate::text::lexicon::{
    self, has_any_phrase, token_string, COMPANY_TYPE_TOKENS, COUNTRY_TOKENS, STATE_TOKENS,
    TITLE_BLACKLIST,
};
use crate::text::RawLine;

/// Lines from the top of the document searched for a name or a location.
const HEADER_SCAN_LINES: usize = 10;
const LOCATION_SCAN_LINES: usize = 25;
const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 50;
const NAME_MAX_WORDS: usize = 4;
const DEFAULT_COUNTRY: &str = "Brasil";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap());

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\s?55\s?|\b55\s?)?(?:\(\d{2}\)|\b\d{2})\s?\d{4,5}[\-\s.]?\d{4}\b").unwrap()
});

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://\S+|\bwww\.\S+|\b(?:[a-z]{2,3}\.)?(?:linkedin|github)\.com/\S+)")
        .unwrap()
});

static LINKEDIN_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)linkedin\.com/in/([A-Za-z0-9\-_.%]+)").unwrap());

static PORTFOLIO_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:portfolio|portfólio|website|site)\s*:?\s*(?P<url>(?:https?://|www\.)\S+)")
        .unwrap()
});

static LOCATION_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:localização|localizacao|location|endereço|endereco|address|cidade)\s*:\s*(?P<place>.+)$")
        .unwrap()
});

static NAME_SHAPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}' .\-]+$").unwrap());

// Lower-case particles kept as-is when title-casing a name.
const NAME_PARTICLES: &[&str] = &["da", "de", "do", "das", "dos", "e", "van", "von"];

/// Distinct e-mail addresses in source order, compared case-insensitively.
pub fn extract_emails(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for m in EMAIL_RE.find_iter(text) {
        let email = m.as_str().trim_end_matches('.');
        if !out.iter().any(|e| e.eq_ignore_ascii_case(email)) {
            out.push(email.to_string());
        }
    }
    out
}

/// Brazilian numbers become `+55…`; anything else is kept verbatim.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.starts_with("55") && digits.len() >= 12 {
        format!("+{digits}")
    } else if matches!(digits.len(), 10 | 11) {
        format!("+55{digits}")
    } else {
        raw.trim().to_string()
    }
}

pub fn extract_phones(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for m in PHONE_RE.find_iter(text) {
        let phone = normalize_phone(m.as_str());
        if !out.contains(&phone) {
            out.push(phone);
        }
    }
    out
}

fn ensure_scheme(url: &str) -> String {
    if url.to_lowercase().starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn strip_trailing(url: &str) -> &str {
    url.trim_end_matches([')', '.', ',', ';'])
}

fn urls(text: &str) -> impl Iterator<Item = String> + '_ {
    URL_RE
        .find_iter(text)
        .map(|m| ensure_scheme(strip_trailing(m.as_str())))
}

/// First link in `text`, scheme ensured.
pub fn first_url(text: &str) -> Option<String> {
    urls(text).next()
}

pub fn extract_links(text: &str) -> CandidateLinks {
    let linkedin = urls(text).find(|u| u.to_lowercase().contains("linkedin.com"));
    let github = urls(text).find(|u| u.to_lowercase().contains("github.com"));
    let portfolio = PORTFOLIO_LABEL_RE
        .captures(text)
        .map(|caps| ensure_scheme(strip_trailing(&caps["url"])))
        .or_else(|| urls(text).find(|u| u.to_lowercase().contains("portfolio")));
    CandidateLinks {
        linkedin,
        github,
        portfolio,
    }
}

fn parse_place(place: &str) -> Option<CandidateLocation> {
    let parts: Vec<&str> = place
        .split([',', '-', '–', '/', '|'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    let city = parts.first().filter(|c| c.chars().count() > 2).map(|c| c.to_string());

    let mut state = None;
    let mut country = None;
    for part in parts.iter().skip(1) {
        if state.is_none() && STATE_TOKENS.iter().any(|s| s.eq_ignore_ascii_case(part)) {
            state = Some(part.to_string());
        } else if country.is_none() && COUNTRY_TOKENS.iter().any(|c| c.eq_ignore_ascii_case(part)) {
            country = Some(part.to_string());
        }
    }
    // Every state token is Brazilian.
    if country.is_none() && state.is_some() {
        country = Some(DEFAULT_COUNTRY.to_string());
    }

    let location = CandidateLocation {
        city,
        state,
        country,
    };
    (!location.is_empty()).then_some(location)
}

/// A `Location:` label anywhere, else the first `City, ST` line near the top.
pub fn extract_location(lines: &[RawLine]) -> Option<CandidateLocation> {
    let labelled = lines
        .iter()
        .find_map(|l| LOCATION_LABEL_RE.captures(&l.text))
        .and_then(|caps| parse_place(&caps["place"]));
    labelled.or_else(|| {
        lines
            .iter()
            .take(LOCATION_SCAN_LINES)
            .find(|l| is_location_line(&l.text) && l.text.contains(','))
            .and_then(|l| parse_place(&l.text))
    })
}

fn looks_like_name(line: &str) -> bool {
    let chars = line.chars().count();
    let words: Vec<&str> = line.split_whitespace().collect();
    (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars)
        && (2..=NAME_MAX_WORDS).contains(&words.len())
        && NAME_SHAPE_RE.is_match(line)
        && !line.ends_with('.')
        && words.iter().any(|w| w.chars().count() > 2)
        && words
            .iter()
            .filter(|w| !NAME_PARTICLES.contains(&w.to_lowercase().as_str()))
            .all(|w| w.chars().next().map_or(false, char::is_uppercase))
        && !is_header(line)
        && !is_location_line(line)
        && !lexicon::has_role_keyword(line)
}

// Employer, school, technology or boilerplate lines share the name shape.
fn names_something_else(line: &str) -> bool {
    let tokens = token_string(line);
    TITLE_BLACKLIST.contains(&tokens.trim())
        || has_any_phrase(&tokens, COMPANY_TYPE_TOKENS)
        || lexicon::has_education_keyword(line)
        || lexicon::known_company(line).is_some()
        || !lexicon::technologies_in(line).is_empty()
}

fn title_case_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if NAME_PARTICLES.contains(&lower.as_str()) {
        return lower;
    }
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn title_case(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| title_case_word(w))
        .collect::<Vec<_>>()
        .join(" ")
}

// "joao-silva-123" and "maria.souza" read as names once split.
fn name_from_handle(handle: &str) -> Option<String> {
    let parts: Vec<&str> = handle
        .split(['-', '_', '.'])
        .filter(|p| p.chars().count() > 1 && !p.chars().all(|c| c.is_ascii_digit()))
        .take(NAME_MAX_WORDS)
        .collect();
    (parts.len() >= 2).then(|| title_case(&parts))
}

/// First name-shaped line near the top, else the LinkedIn slug, else the
/// e-mail local part.
pub fn guess_name(lines: &[RawLine], text: &str) -> Option<String> {
    let from_lines = lines.iter().take(HEADER_SCAN_LINES).find_map(|l| {
        let line = l.text.as_str();
        if (is_all_caps_name(line) || looks_like_name(line)) && !names_something_else(line) {
            let words: Vec<&str> = line.split_whitespace().collect();
            Some(if line == line.to_uppercase() {
                title_case(&words)
            } else {
                words.join(" ")
            })
        } else {
            None
        }
    });
    from_lines
        .or_else(|| {
            LINKEDIN_SLUG_RE
                .captures(text)
                .and_then(|caps| name_from_handle(&caps[1]))
        })
        .or_else(|| {
            EMAIL_RE
                .find(text)
                .and_then(|m| m.as_str().split('@').next())
                .and_then(name_from_handle)
        })
}

pub fn extract_candidate(lines: &[RawLine], text: &str) -> Candidate {
    Candidate {
        full_name: guess_name(lines, text),
        emails: extract_emails(text),
        phones: extract_phones(text),
        location: extract_location(lines),
        links: extract_links(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::split_lines;

    #[test]
    fn test_emails_deduplicated_in_order() {
        let text = "maria@example.com, Maria@Example.com; joao.silva@empresa.com.br.";
        assert_eq!(
            extract_emails(text),
            vec!["maria@example.com", "joao.silva@empresa.com.br"]
        );
    }

    #[test]
    fn test_phone_normalization() {
        assert_eq!(normalize_phone("(47) 99999-1234"), "+5547999991234");
        assert_eq!(normalize_phone("+55 47 99999-1234"), "+5547999991234");
        assert_eq!(normalize_phone("4733221100"), "+554733221100");
        assert_eq!(normalize_phone("123-4567"), "123-4567");
    }

    #[test]
    fn test_phones_found_in_text() {
        let phones = extract_phones("Tel: (47) 99999-1234 | +55 11 3333-4444");
        assert_eq!(phones, vec!["+5547999991234", "+551133334444"]);
    }

    #[test]
    fn test_date_ranges_are_not_phones() {
        assert!(extract_phones("2010 - 2014\nJan 2019 - Present").is_empty());
    }

    #[test]
    fn test_links() {
        let text = "linkedin.com/in/joao-silva-123 | Github https://github.com/jsilva).\nPortfolio: www.jsilva.dev";
        let links = extract_links(text);
        assert_eq!(links.linkedin.as_deref(), Some("https://linkedin.com/in/joao-silva-123"));
        assert_eq!(links.github.as_deref(), Some("https://github.com/jsilva"));
        assert_eq!(links.portfolio.as_deref(), Some("https://www.jsilva.dev"));
    }

    #[test]
    fn test_location_from_city_state_line() {
        let lines = split_lines("Maria Souza\nBlumenau, SC\nmaria@example.com");
        let location = extract_location(&lines).unwrap();
        assert_eq!(location.city.as_deref(), Some("Blumenau"));
        assert_eq!(location.state.as_deref(), Some("SC"));
        assert_eq!(location.country.as_deref(), Some("Brasil"));
    }

    #[test]
    fn test_location_from_label() {
        let lines = split_lines("Location: Lisbon, Portugal");
        let location = extract_location(&lines).unwrap();
        assert_eq!(location.city.as_deref(), Some("Lisbon"));
        assert_eq!(location.state, None);
        assert_eq!(location.country.as_deref(), Some("Portugal"));
    }

    #[test]
    fn test_name_from_first_lines() {
        let lines = split_lines("MARIA DA SILVA\nSoftware Architect");
        assert_eq!(guess_name(&lines, ""), Some("Maria da Silva".to_string()));

        let lines = split_lines("Curriculum Vitae\nJoão Pedro Souza\nBackend Developer");
        assert_eq!(guess_name(&lines, ""), Some("João Pedro Souza".to_string()));
    }

    #[test]
    fn test_name_falls_back_to_linkedin_then_email() {
        let lines = split_lines("Software Architect\nAcme Corp");
        let text = "linkedin.com/in/joao-silva-123";
        assert_eq!(guess_name(&lines, text), Some("Joao Silva".to_string()));
        assert_eq!(
            guess_name(&lines, "ana.costa@example.com"),
            Some("Ana Costa".to_string())
        );
        assert_eq!(guess_name(&lines, "contato@example.com"), None);
    }

    #[test]
    fn test_role_and_company_lines_are_not_names() {
        assert!(!looks_like_name("Software Architect"));
        assert!(names_something_else("Senior Sistemas"));
        assert!(names_something_else("ACME CORP"));
        assert!(names_something_else("Java Kotlin"));
        assert!(names_something_else("Curriculum Vitae"));
        assert!(looks_like_name("Ana Paula Costa"));
        assert!(!names_something_else("Ana Paula Costa"));
    }
}
