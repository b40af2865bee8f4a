use thiserror::Error;

/// Result type used across the Leadline crates.
pub type Result<T> = std::result::Result<T, LeadlineError>;

/// Canonical error representation shared by all crates.
#[derive(Debug, Error)]
pub enum LeadlineError {
    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("lead {id} has a corrupt {field} value: {message}")]
    CorruptRecord {
        id: u64,
        field: &'static str,
        message: String,
    },

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl LeadlineError {
    /// Shorthand for a validation failure on a named field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        LeadlineError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Whether the error was caused by caller-supplied input.
    pub fn is_validation(&self) -> bool {
        matches!(self, LeadlineError::Validation { .. })
    }
}

/// Problems with the `LEADLINE_*` environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {key}: {value}")]
    InvalidEnvVar { key: String, value: String },

    #[error("home directory not found")]
    HomeDirNotFound,
}
