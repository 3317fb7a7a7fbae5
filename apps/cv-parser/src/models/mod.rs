pub mod resume;

pub use resume::{
    Candidate, CandidateLinks, CandidateLocation, Certification, DocumentMeta, EducationRecord,
    EmploymentType, ExperienceRecord, Language, Project, ResumeDocument, Skill, SkillLevel,
};
