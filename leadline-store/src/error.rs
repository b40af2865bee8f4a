use std::path::PathBuf;

use leadline_core::LeadlineError;
use leadline_protocol::lead::LeadId;
use thiserror::Error;

/// Errors returned by lead store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to create database directory {path}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("lead {id} has a corrupt {field} value: {message}")]
    Corrupt {
        id: LeadId,
        field: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn required(field: &'static str) -> Self {
        StoreError::Validation {
            field,
            message: "must not be empty".into(),
        }
    }

    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::CreateDir {
            path: path.into().display().to_string(),
            source,
        }
    }

    pub fn corrupt(id: LeadId, field: &'static str, message: impl Into<String>) -> Self {
        StoreError::Corrupt {
            id,
            field,
            message: message.into(),
        }
    }
}

impl From<StoreError> for LeadlineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation { field, message } => {
                LeadlineError::Validation { field, message }
            }
            StoreError::Corrupt { id, field, message } => {
                LeadlineError::CorruptRecord { id, field, message }
            }
            other => LeadlineError::Storage(other.to_string()),
        }
    }
}
