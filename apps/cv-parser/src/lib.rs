//! Heuristic field extraction for résumés that have already been converted to
//! plain text.
//!
//! ```no_run
//! let document = cv_parser::parse_resume("Software Architect\nAcme Corp\nJanuary 2020 - Present");
//! assert_eq!(document.experiences[0].company.as_deref(), Some("Acme Corp"));
//! ```

pub mod config;
pub mod dates;
pub mod errors;
pub mod extraction;
pub mod models;
pub mod pipeline;
pub mod text;

pub use config::{Config, ExtractionSettings};
pub use errors::AppError;
pub use models::ResumeDocument;
pub use pipeline::{parse_resume, ResumeParser, PARSER_VERSION};
