//! Projects and document-wide achievement bullets.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::dates::contains_date_range;
use crate::extraction::contact::first_url;
use crate::extraction::experience::clean_achievement;
use crate::extraction::section_map;
use crate::models::Project;
use crate::text::classifier::{
    is_bullet_line, is_header, is_sentence_like, is_skill_list_line, strip_bullet,
};
use crate::text::lexicon::technologies_in;
use crate::text::{RawLine, SectionKind};

const MAX_ACHIEVEMENTS: usize = 10;
const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 60;
const SECTION_CONFIDENCE: f64 = 0.7;
const LABEL_CONFIDENCE: f64 = 0.6;

// Between a project name and its inline description.
const NAME_SEPARATORS: &[&str] = &[" - ", " – ", " — ", ": ", " | "];

static LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:projeto|project)\s*[:\-–—]\s*(?P<body>\S.{7,})$").unwrap()
});

static QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(?P<a>[^"]{3,60})"|“(?P<b>[^”]{3,60})”"#).unwrap());

struct Draft {
    name: String,
    details: Vec<String>,
    url: Option<String>,
    from_bullet: bool,
    confidence: f64,
}

impl Draft {
    fn open(text: &str, from_bullet: bool, confidence: f64) -> Option<Self> {
        let (name, inline) = split_title(title_text(text))?;
        Some(Self {
            name,
            details: inline.into_iter().collect(),
            url: first_url(text),
            from_bullet,
            confidence,
        })
    }

    fn absorb(&mut self, text: &str) {
        if self.url.is_none() {
            self.url = first_url(text);
        }
        if is_url_only(text) || contains_date_range(text) {
            return;
        }
        self.details.push(strip_bullet(text).trim().to_string());
    }

    fn into_project(self) -> Project {
        let mut technologies: Vec<String> = Vec::new();
        let texts = std::iter::once(self.name.as_str()).chain(self.details.iter().map(String::as_str));
        for tech in texts.flat_map(technologies_in) {
            if !technologies.iter().any(|t| t == tech) {
                technologies.push(tech.to_string());
            }
        }
        Project {
            description: (!self.details.is_empty()).then(|| self.details.join(" ")),
            name: self.name,
            technologies,
            url: self.url,
            confidence: self.confidence,
        }
    }
}

fn is_url_only(text: &str) -> bool {
    text.split_whitespace().count() == 1 && first_url(text).is_some()
}

// `Project: X` labels carry the title in their body.
fn title_text(text: &str) -> &str {
    LABEL_RE
        .captures(text)
        .and_then(|caps| caps.name("body"))
        .map_or(text, |m| m.as_str())
}

fn valid_name(name: &str) -> bool {
    name.chars().count() >= NAME_MIN_CHARS
        && name.chars().any(char::is_alphabetic)
        && !is_header(name)
        && !contains_date_range(name)
        && first_url(name).is_none()
}

/// Project name and inline description of a title line. A quoted name wins;
/// otherwise the name runs up to the first separator.
fn split_title(text: &str) -> Option<(String, Option<String>)> {
    let text = strip_bullet(text).trim();
    let non_empty = |s: &str| {
        let s = s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':' | '|'));
        (!s.is_empty()).then(|| s.to_string())
    };

    if let Some(caps) = QUOTED_RE.captures(text) {
        let quoted = caps.get(0).map_or("", |m| m.as_str());
        let name = caps.name("a").or_else(|| caps.name("b")).map_or("", |m| m.as_str()).trim();
        return valid_name(name)
            .then(|| (name.to_string(), non_empty(text.replacen(quoted, "", 1).as_str())));
    }

    let (head, tail) = NAME_SEPARATORS
        .iter()
        .filter_map(|sep| text.split_once(sep))
        .min_by_key(|(head, _)| head.len())
        .map_or((text, None), |(head, tail)| (head, Some(tail)));
    let name: String = head
        .trim()
        .trim_end_matches(['.', ',', ';'])
        .chars()
        .take(NAME_MAX_CHARS)
        .collect();
    let name = name.trim_end().to_string();
    valid_name(&name).then(|| (name, tail.and_then(non_empty)))
}

// Inside a Projects section: title lines open a project and the lines below
// describe it. A section written as a bullet list opens one project per bullet.
fn section_drafts(lines: &[RawLine], sections: &[Option<SectionKind>]) -> Vec<Draft> {
    let mut drafts: Vec<Draft> = Vec::new();
    for (line, section) in lines.iter().zip(sections) {
        let text = line.text.trim();
        if *section != Some(SectionKind::Projects) || is_header(text) {
            continue;
        }
        let bullet = is_bullet_line(text);
        let opens = match drafts.last() {
            None => bullet || !(is_url_only(text) || contains_date_range(text)),
            Some(last) if bullet => last.from_bullet,
            Some(_) => !(is_sentence_like(text)
                || is_skill_list_line(text)
                || is_url_only(text)
                || contains_date_range(text)),
        };
        if opens {
            drafts.extend(Draft::open(text, bullet, SECTION_CONFIDENCE));
        } else if let Some(last) = drafts.last_mut() {
            last.absorb(text);
        }
    }
    drafts
}

fn label_drafts(lines: &[RawLine], sections: &[Option<SectionKind>]) -> Vec<Draft> {
    lines
        .iter()
        .zip(sections)
        .filter(|(line, section)| {
            **section != Some(SectionKind::Projects) && LABEL_RE.is_match(&line.text)
        })
        .filter_map(|(line, _)| Draft::open(&line.text, false, LABEL_CONFIDENCE))
        .collect()
}

/// Projects from a Projects section plus `Project: …` labels elsewhere,
/// deduplicated by name (first occurrence wins).
pub fn extract_projects(lines: &[RawLine]) -> Vec<Project> {
    let sections = section_map(lines);
    let mut seen = HashSet::new();
    let projects: Vec<Project> = section_drafts(lines, &sections)
        .into_iter()
        .chain(label_drafts(lines, &sections))
        .filter(|d| seen.insert(d.name.to_lowercase()))
        .map(Draft::into_project)
        .collect();
    debug!("Found {} projects", projects.len());
    projects
}

/// Bullet lines anywhere outside skill, language and contact sections, plus
/// every line of an awards section. Deduplicated, at most ten.
pub fn extract_achievements(lines: &[RawLine]) -> Vec<String> {
    let sections = section_map(lines);
    let mut seen = HashSet::new();
    lines
        .iter()
        .zip(&sections)
        .filter(|(line, section)| match section {
            Some(SectionKind::Awards) => !is_header(&line.text),
            Some(SectionKind::Skills | SectionKind::Languages | SectionKind::Contact) => false,
            _ => is_bullet_line(&line.text),
        })
        .filter(|(line, _)| !is_skill_list_line(&line.text))
        .filter_map(|(line, _)| clean_achievement(&line.text))
        .filter(|a| seen.insert(a.to_lowercase()))
        .take(MAX_ACHIEVEMENTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::split_lines;

    fn projects(text: &str) -> Vec<Project> {
        extract_projects(&split_lines(text))
    }

    #[test]
    fn test_section_titles_collect_their_details() {
        let found = projects(
            "Projetos\nPayment Gateway\n- Processes card payments with Kafka and Java\ngithub.com/maria/payment-gateway\nInventory Bot: stock alerts in Python\nExperience\nDeveloper",
        );
        assert_eq!(found.len(), 2);

        let gateway = &found[0];
        assert_eq!(gateway.name, "Payment Gateway");
        assert_eq!(
            gateway.description.as_deref(),
            Some("Processes card payments with Kafka and Java")
        );
        assert!(gateway.technologies.contains(&"kafka".to_string()));
        assert!(gateway.technologies.contains(&"java".to_string()));
        assert_eq!(gateway.url.as_deref(), Some("https://github.com/maria/payment-gateway"));
        assert_eq!(gateway.confidence, SECTION_CONFIDENCE);

        let bot = &found[1];
        assert_eq!(bot.name, "Inventory Bot");
        assert_eq!(bot.description.as_deref(), Some("stock alerts in Python"));
        assert_eq!(bot.technologies, vec!["python"]);
        assert_eq!(bot.url, None);
    }

    #[test]
    fn test_bullet_list_section_opens_one_project_per_bullet() {
        let found = projects(
            "Projects\n- \"Cardápio Digital\" - menu ordering app in React\n- Inventory Bot: stock alerts in Python\n- Inventory Bot: duplicate entry",
        );
        let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Cardápio Digital", "Inventory Bot"]);
        assert_eq!(found[0].description.as_deref(), Some("menu ordering app in React"));
        assert_eq!(found[0].technologies, vec!["react"]);
    }

    #[test]
    fn test_project_label_outside_section() {
        let found = projects(
            "Experience\nDeveloper\nAcme Corp\n2020 - 2022\nProject: Billing Revamp - moved invoices to a new ledger",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Billing Revamp");
        assert_eq!(found[0].description.as_deref(), Some("moved invoices to a new ledger"));
        assert_eq!(found[0].confidence, LABEL_CONFIDENCE);
    }

    #[test]
    fn test_dates_and_bare_links_never_name_a_project() {
        assert!(projects("Projects\n2021 - 2022\ngithub.com/maria/tool").is_empty());
        assert!(projects("Experience\nDeveloper\nAcme Corp").is_empty());
    }

    #[test]
    fn test_achievements_are_deduplicated_and_capped() {
        let mut text = String::from(
            "Experience\n- Led the migration of billing to Kubernetes\n- led the migration of billing to kubernetes\nSkills\n- Strong knowledge of distributed systems\nAwards\nBest Paper Award at SBES 2019\n",
        );
        for i in 0..12 {
            text.push_str(&format!("- Delivered release number {i} on schedule\n"));
        }
        let found = extract_achievements(&split_lines(&text));
        assert_eq!(found.len(), MAX_ACHIEVEMENTS);
        assert_eq!(found[0], "Led the migration of billing to Kubernetes");
        assert_eq!(found[1], "Best Paper Award at SBES 2019");
        assert!(!found.iter().any(|a| a.contains("distributed systems")));
    }

    #[test]
    fn test_fragments_are_not_achievements() {
        let found = extract_achievements(&split_lines("- Short\n- Responsável pela equipe de\nJava, Spring, Docker"));
        assert!(found.is_empty());
    }
}
