use std::io::{self, Read, Write};
use std::process::ExitCode;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cv_parser::config::Config;
use cv_parser::errors::AppError;
use cv_parser::pipeline::ResumeParser;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report();
            eprintln!("cv-parser: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run() -> Result<(), AppError> {
    let config = Config::from_env().map_err(|e| AppError::Config(format!("{e:#}")))?;

    // Logs go to stderr; stdout carries the JSON document.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("Starting cv-parser v{}", env!("CARGO_PKG_VERSION"));

    let text = read_input(std::env::args().nth(1))?;
    let parser = ResumeParser::new(config.extraction);
    let document = parser.parse(&text);

    let months = document.total_experience_months(Utc::now().date_naive());
    info!("Total experience: {} years {} months", months / 12, months % 12);

    let json = if config.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

/// Reads the file named on the command line, or stdin when there is none or it is `-`.
fn read_input(path: Option<String>) -> Result<String, AppError> {
    match path.as_deref() {
        None | Some("-") => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
        Some(path) => {
            info!("Reading {path}");
            Ok(std::fs::read_to_string(path)?)
        }
    }
}
