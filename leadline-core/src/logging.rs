use tracing_subscriber::filter::EnvFilter;

use crate::errors::{LeadlineError, Result};

/// Installs the global subscriber for the binaries.
///
/// `RUST_LOG` wins over `level` when set. Events go to stderr so stdout only
/// carries command output.
pub fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|err| LeadlineError::Logging(format!("invalid log level {level:?}: {err}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .compact()
        .try_init()
        .map_err(|err| LeadlineError::Logging(err.to_string()))
}
