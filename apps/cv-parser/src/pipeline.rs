//! `ResumeParser`: the single entry point tying the extractors together.

use tracing::{debug, info};

use crate::config::ExtractionSettings;
use crate::extraction::contact::extract_candidate;
use crate::extraction::dictionary::{extract_certifications, extract_languages, extract_skills};
use crate::extraction::education::{extract_education, merge_education};
use crate::extraction::experience::extract_experiences;
use crate::extraction::projects::{extract_achievements, extract_projects};
use crate::extraction::summary::extract_summary;
use crate::models::{DocumentMeta, EducationRecord, ResumeDocument};
use crate::text::{normalize_text, split_lines};

pub const PARSER_VERSION: &str = concat!("cv-parser/", env!("CARGO_PKG_VERSION"));

// ── overall confidence ──────────────────────────────────────────────────────

const BASE_CONFIDENCE: f64 = 0.6;
const NAME_BONUS: f64 = 0.15;
const EMAIL_BONUS: f64 = 0.1;
const SUMMARY_BONUS: f64 = 0.05;
const SKILLS_BONUS: f64 = 0.1;
const EXPERIENCE_BONUS: f64 = 0.1;
const EDUCATION_BONUS: f64 = 0.05;
const CERTIFICATION_BONUS: f64 = 0.03;
const MAX_OVERALL_CONFIDENCE: f64 = 0.98;

/// Stateless apart from its settings; share it freely across threads.
#[derive(Debug, Clone, Default)]
pub struct ResumeParser {
    settings: ExtractionSettings,
}

impl ResumeParser {
    pub fn new(settings: ExtractionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExtractionSettings {
        &self.settings
    }

    pub fn parse(&self, raw: &str) -> ResumeDocument {
        self.parse_with_education(raw, Vec::new())
    }

    /// Parses `raw`, treating `prior` as education already known for this
    /// candidate. Prior records reserve their ranges exactly like extracted ones
    /// and are merged into the returned education list.
    pub fn parse_with_education(&self, raw: &str, prior: Vec<EducationRecord>) -> ResumeDocument {
        let normalized = normalize_text(raw);
        let lines = split_lines(&normalized);
        debug!("Normalized {} chars into {} lines", raw.len(), lines.len());

        let mut education = prior;
        education.extend(extract_education(&lines, &self.settings));
        let education = merge_education(education);

        let experiences = extract_experiences(&lines, &education, &self.settings);
        let candidate = extract_candidate(&lines, &normalized);
        let summary = extract_summary(&lines);
        let skills = extract_skills(&lines);
        let languages = extract_languages(&lines);
        let certifications = extract_certifications(&lines);
        let projects = extract_projects(&lines);
        let achievements = extract_achievements(&lines);
        debug!(
            "Dictionary matches: {} skills, {} languages, {} certifications",
            skills.len(),
            languages.len(),
            certifications.len()
        );

        let mut document = ResumeDocument {
            candidate,
            summary,
            experiences,
            education,
            skills,
            languages,
            certifications,
            meta: DocumentMeta {
                raw_length: raw.len(),
                parser_version: PARSER_VERSION.to_string(),
                confidence_overall: 0.0,
                projects,
                achievements,
            },
        };
        document.meta.confidence_overall = overall_confidence(&document);

        info!(
            "Parsed résumé: {} experiences, {} education, {} skills (confidence {:.2})",
            document.experiences.len(),
            document.education.len(),
            document.skills.len(),
            document.meta.confidence_overall
        );
        document
    }
}

/// Parses with default settings.
pub fn parse_resume(raw: &str) -> ResumeDocument {
    ResumeParser::default().parse(raw)
}

pub fn overall_confidence(document: &ResumeDocument) -> f64 {
    let bonuses = [
        (document.candidate.full_name.is_some(), NAME_BONUS),
        (!document.candidate.emails.is_empty(), EMAIL_BONUS),
        (document.summary.is_some(), SUMMARY_BONUS),
        (!document.skills.is_empty(), SKILLS_BONUS),
        (!document.experiences.is_empty(), EXPERIENCE_BONUS),
        (!document.education.is_empty(), EDUCATION_BONUS),
        (!document.certifications.is_empty(), CERTIFICATION_BONUS),
    ];
    let score = bonuses
        .iter()
        .filter(|(present, _)| *present)
        .fold(BASE_CONFIDENCE, |acc, (_, bonus)| acc + bonus);
    (score.min(MAX_OVERALL_CONFIDENCE) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::{DateRange, YearMonth};

    const SAMPLE: &str = "\
MARIA DA SILVA
Blumenau, SC
maria.silva@example.com | (47) 99999-1234
linkedin.com/in/maria-silva

Resumo
Arquiteta de software com foco em sistemas distribuídos e pagamentos.

Experiência Profissional
Software Architect
Acme Corp
January 2020 - Present
- Led the migration of the billing platform to Kubernetes
Java, Spring Boot, Kafka

Backend Developer
Senior Sistemas
03/2016 - 12/2019

Formação Acadêmica
Universidade Federal — 2010-2014
Bachelor in Computer Science

Idiomas
Inglês - Avançado

Certificações
AWS Certified Developer - Associate 2022
";

    #[test]
    fn test_architect_at_acme() {
        let document = parse_resume("Software Architect\nAcme Corp\nJanuary 2020 - Present");
        assert_eq!(document.experiences.len(), 1);
        let job = &document.experiences[0];
        assert_eq!(job.role.as_deref(), Some("Software Architect"));
        assert_eq!(job.company.as_deref(), Some("Acme Corp"));
        let range = job.range.unwrap();
        assert_eq!(range.start, YearMonth::new(2020, 1));
        assert_eq!(range.end, None);
        assert!(range.is_current);
        assert!(job.confidence >= 0.9);
    }

    #[test]
    fn test_university_with_degree_below() {
        let document =
            parse_resume("Universidade Federal — 2010-2014\nBachelor in Computer Science");
        assert_eq!(document.education.len(), 1);
        let edu = &document.education[0];
        assert_eq!(edu.institution.as_deref(), Some("Universidade Federal"));
        assert_eq!(edu.degree.as_deref(), Some("Bachelor in Computer Science"));
        let range = edu.range.unwrap();
        assert_eq!(range.start, YearMonth::new(2010, 1));
        assert_eq!(range.end, YearMonth::new(2014, 1));
        assert!(document.experiences.is_empty());
    }

    #[test]
    fn test_full_document() {
        let document = parse_resume(SAMPLE);

        assert_eq!(document.candidate.full_name.as_deref(), Some("Maria da Silva"));
        assert_eq!(document.candidate.emails, vec!["maria.silva@example.com"]);
        assert_eq!(document.candidate.phones, vec!["+5547999991234"]);
        assert_eq!(
            document.candidate.links.linkedin.as_deref(),
            Some("https://linkedin.com/in/maria-silva")
        );
        let location = document.candidate.location.as_ref().unwrap();
        assert_eq!(location.city.as_deref(), Some("Blumenau"));
        assert!(document.summary.as_deref().unwrap().starts_with("Arquiteta"));

        assert_eq!(document.experiences.len(), 2);
        assert_eq!(document.experiences[0].company.as_deref(), Some("Acme Corp"));
        assert_eq!(document.experiences[0].role.as_deref(), Some("Software Architect"));
        assert_eq!(document.experiences[1].company.as_deref(), Some("Senior Sistemas"));
        assert_eq!(document.experiences[1].role.as_deref(), Some("Backend Developer"));

        assert_eq!(document.education.len(), 1);
        assert_eq!(document.education[0].institution.as_deref(), Some("Universidade Federal"));

        assert!(document.skills.iter().any(|s| s.name == "kafka"));
        assert_eq!(document.languages[0].level_cefr.as_deref(), Some("C1"));
        assert_eq!(document.certifications[0].year, Some(2022));

        assert_eq!(document.meta.raw_length, SAMPLE.len());
        assert_eq!(document.meta.parser_version, PARSER_VERSION);
        assert_eq!(document.meta.confidence_overall, 0.98);
    }

    #[test]
    fn test_experience_never_overlaps_education() {
        let text = "\
Education
Universidade Federal
Bachelor in Computer Science
2010 - 2014
Experience
Estagiário de Desenvolvimento
Acme Corp
2012 - 2013
Developer
Beta Tecnologia
2015 - 2018";
        let document = parse_resume(text);
        assert_eq!(document.education.len(), 1);
        for job in &document.experiences {
            let range = job.range.unwrap();
            for edu in &document.education {
                assert!(!range.overlaps_reserved(&edu.range.unwrap()));
            }
        }
        assert_eq!(document.experiences.len(), 1);
        assert_eq!(document.experiences[0].company.as_deref(), Some("Beta Tecnologia"));
    }

    #[test]
    fn test_prior_education_is_reserved_and_merged() {
        let prior = vec![EducationRecord {
            institution: Some("Instituto Federal".into()),
            degree: None,
            range: DateRange::new(YearMonth::new(2015, 1), YearMonth::new(2016, 1), false),
            confidence: 0.7,
        }];
        let text = "Monitor\nInstituto Federal\n2015 - 2016\nDeveloper\nAcme Corp\n2017 - Present";
        let document = ResumeParser::default().parse_with_education(text, prior);

        assert_eq!(document.experiences.len(), 1);
        assert_eq!(document.experiences[0].company.as_deref(), Some("Acme Corp"));
        assert_eq!(document.education.len(), 1);
        assert_eq!(document.education[0].institution.as_deref(), Some("Instituto Federal"));
    }

    #[test]
    fn test_education_window_stops_at_header() {
        let text = "Developer\nAcme Corp\n2015 - 2018\nEducation\nUniversidade Federal\n2010 - 2014";
        let document = parse_resume(text);
        assert_eq!(document.experiences.len(), 1);
        assert_eq!(document.experiences[0].role.as_deref(), Some("Developer"));
        assert_eq!(document.experiences[0].company.as_deref(), Some("Acme Corp"));
        assert_eq!(document.education.len(), 1);
        assert_eq!(document.education[0].institution.as_deref(), Some("Universidade Federal"));
    }

    #[test]
    fn test_ongoing_degree_blocks_overlapping_job() {
        let text = "\
Education
Bacharelado em Ciência da Computação
Universidade Federal
2021 - Atual
Experience
Developer
Acme Corp
2022 - 2023";
        let document = parse_resume(text);
        assert_eq!(document.education.len(), 1);
        let degree = document.education[0].range.unwrap();
        assert!(degree.is_current);
        assert!(document.experiences.is_empty());
    }

    #[test]
    fn test_projects_and_achievements_in_meta() {
        let text = "\
Experience
Developer
Acme Corp
2020 - 2022
- Reduced checkout latency by forty percent
Projects
Payment Gateway
- Card payments over Kafka queues";
        let document = parse_resume(text);
        assert_eq!(document.meta.projects.len(), 1);
        assert_eq!(document.meta.projects[0].name, "Payment Gateway");
        assert_eq!(
            document.meta.achievements,
            vec!["Reduced checkout latency by forty percent", "Card payments over Kafka queues"]
        );
    }

    #[test]
    fn test_empty_input() {
        let document = parse_resume("");
        assert!(document.experiences.is_empty());
        assert!(document.education.is_empty());
        assert!(document.meta.projects.is_empty());
        assert_eq!(document.candidate.full_name, None);
        assert_eq!(document.meta.confidence_overall, 0.6);
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<ResumeParser>();
        let parser = ResumeParser::new(ExtractionSettings {
            experience_window: 2,
            ..ExtractionSettings::default()
        });
        assert_eq!(parser.settings().experience_window, 2);
    }
}
