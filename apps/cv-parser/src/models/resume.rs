use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::DateRange;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLocation {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl CandidateLocation {
    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.state.is_none() && self.country.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLinks {
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
}

/// Identity and contact points found in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub full_name: Option<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub location: Option<CandidateLocation>,
    pub links: CandidateLinks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Freelance,
    Internship,
}

/// One job, anchored on the line that carried its date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub company: Option<String>,
    pub role: Option<String>,
    pub range: Option<DateRange>,
    pub confidence: f64,
    pub location: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub achievements: Vec<String>,
    pub tech_stack: Vec<String>,
    /// Index of the pivot line in the normalized line stream.
    pub source_line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub range: Option<DateRange>,
    pub confidence: f64,
}

impl EducationRecord {
    /// Fills empty slots from `other` and keeps the higher confidence.
    pub fn absorb(&mut self, other: EducationRecord) {
        if self.institution.is_none() {
            self.institution = other.institution;
        }
        if self.degree.is_none() {
            self.degree = other.degree;
        }
        self.confidence = self.confidence.max(other.confidence);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Expert,
    Intermediate,
    Beginner,
    Na,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: String,
    pub level: SkillLevel,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub level_cefr: Option<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuer: Option<String>,
    pub year: Option<i32>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub url: Option<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub raw_length: usize,
    pub parser_version: String,
    pub confidence_overall: f64,
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Bullet achievements across the whole document, deduplicated.
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// Everything extracted from one résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub candidate: Candidate,
    pub summary: Option<String>,
    pub experiences: Vec<ExperienceRecord>,
    pub education: Vec<EducationRecord>,
    pub skills: Vec<Skill>,
    pub languages: Vec<Language>,
    pub certifications: Vec<Certification>,
    pub meta: DocumentMeta,
}

impl ResumeDocument {
    /// Months covered by at least one dated experience as of `reference`.
    /// Overlapping jobs are counted once; open ranges end at `reference`.
    pub fn total_experience_months(&self, reference: NaiveDate) -> u32 {
        let mut spans: Vec<(i32, i32)> = self
            .experiences
            .iter()
            .filter_map(|e| e.range.as_ref()?.bounded_span(reference))
            .collect();
        spans.sort_unstable();

        let mut total = 0;
        let mut current: Option<(i32, i32)> = None;
        for (lo, hi) in spans {
            current = match current {
                Some((cur_lo, cur_hi)) if lo <= cur_hi => Some((cur_lo, cur_hi.max(hi))),
                Some((cur_lo, cur_hi)) => {
                    total += cur_hi - cur_lo;
                    Some((lo, hi))
                }
                None => Some((lo, hi)),
            };
        }
        if let Some((lo, hi)) = current {
            total += hi - lo;
        }
        total.max(0) as u32
    }
}
