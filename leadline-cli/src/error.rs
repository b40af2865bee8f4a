use std::io;

use leadline_core::errors::ConfigError;
use leadline_core::LeadlineError;
use leadline_protocol::lead::LeadId;
use leadline_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Leadline(#[from] LeadlineError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to open lead database: {0}")]
    Store(#[from] StoreError),
    #[error("no caller identity; pass --user or set LEADLINE_USER")]
    MissingUser,
    #[error("lead {0} does not exist or is not visible to you")]
    NotFound(LeadId),
    #[error("failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: io::Error,
    },
}
