//! Domain error types.

/// Top-level error type for portfolio analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("failed to write {path}: {reason}")]
    IoFailure { path: String, reason: String },
}

impl AnalysisError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        AnalysisError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&AnalysisError> for std::process::ExitCode {
    fn from(err: &AnalysisError) -> Self {
        let code: u8 = match err {
            AnalysisError::IoFailure { .. } => 1,
            AnalysisError::ConfigParse { .. }
            | AnalysisError::ConfigMissing { .. }
            | AnalysisError::InvalidInput { .. } => 2,
            AnalysisError::DataUnavailable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
