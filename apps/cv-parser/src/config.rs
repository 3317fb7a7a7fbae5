use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Window sizes, in lines, used by the extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// Lines scanned before and after an experience pivot for role/company.
    pub experience_window: usize,
    /// Lines before and after a year-range pivot searched for institution/degree.
    pub education_context: usize,
    /// Radius searched for a range around a keyword-only education line.
    pub education_fallback_radius: usize,
    /// Radius of the last-resort known-company search.
    pub known_company_radius: usize,
    /// How far back the nearest section header is looked up.
    pub header_lookback: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            experience_window: 4,
            education_context: 2,
            education_fallback_radius: 5,
            known_company_radius: 6,
            header_lookback: 15,
        }
    }
}

/// Harness configuration loaded from environment variables (and `.env`).
/// Every variable is optional; malformed values are errors.
#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    pub pretty: bool,
    pub extraction: ExtractionSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ExtractionSettings::default();
        Ok(Config {
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            pretty: match lookup("CV_PARSER_PRETTY") {
                Some(raw) => parse_bool(&raw).context("CV_PARSER_PRETTY must be true or false")?,
                None => true,
            },
            extraction: ExtractionSettings {
                experience_window: parse_or(
                    &lookup,
                    "CV_PARSER_EXPERIENCE_WINDOW",
                    defaults.experience_window,
                )?,
                education_context: parse_or(
                    &lookup,
                    "CV_PARSER_EDUCATION_CONTEXT",
                    defaults.education_context,
                )?,
                education_fallback_radius: parse_or(
                    &lookup,
                    "CV_PARSER_EDUCATION_FALLBACK_RADIUS",
                    defaults.education_fallback_radius,
                )?,
                known_company_radius: parse_or(
                    &lookup,
                    "CV_PARSER_KNOWN_COMPANY_RADIUS",
                    defaults.known_company_radius,
                )?,
                header_lookback: parse_or(
                    &lookup,
                    "CV_PARSER_HEADER_LOOKBACK",
                    defaults.header_lookback,
                )?,
            },
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("'{other}' is not a boolean"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.rust_log, "info");
        assert!(config.pretty);
        assert_eq!(config.extraction, ExtractionSettings::default());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("RUST_LOG", "debug"),
            ("CV_PARSER_PRETTY", "false"),
            ("CV_PARSER_EXPERIENCE_WINDOW", "6"),
            ("CV_PARSER_HEADER_LOOKBACK", " 20 "),
        ]))
        .unwrap();
        assert_eq!(config.rust_log, "debug");
        assert!(!config.pretty);
        assert_eq!(config.extraction.experience_window, 6);
        assert_eq!(config.extraction.header_lookback, 20);
        assert_eq!(config.extraction.education_context, 2);
    }

    #[test]
    fn test_invalid_number_names_the_variable() {
        let err = Config::from_lookup(lookup(&[("CV_PARSER_EDUCATION_CONTEXT", "two")])).unwrap_err();
        assert!(err.to_string().contains("CV_PARSER_EDUCATION_CONTEXT"));
    }

    #[test]
    fn test_invalid_bool_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("CV_PARSER_PRETTY", "maybe")])).is_err());
    }
}
