use thiserror::Error;

/// Failures of the command-line harness. The extraction core itself never
/// fails: unrecognized input yields empty fields.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// sysexits-style process exit code.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 78,
            AppError::Input(_) => 66,
            AppError::Serialization(_) | AppError::Internal(_) => 70,
        }
    }

    /// Logs the error once at the level it deserves.
    pub fn report(&self) {
        match self {
            AppError::Config(msg) => tracing::error!("Invalid configuration: {msg}"),
            AppError::Input(e) => tracing::error!("Could not read résumé text: {e}"),
            AppError::Serialization(e) => tracing::error!("Could not encode document: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_become_input_errors() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "cv.txt").into();
        assert!(matches!(err, AppError::Input(_)));
        assert_eq!(err.exit_code(), 66);
        assert_eq!(err.to_string(), "Input error: cv.txt");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::Config("CV_PARSER_PRETTY".into()).exit_code(), 78);
        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err.exit_code(), 70);
        let err: AppError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(err.to_string().starts_with("Serialization error"));
    }
}
