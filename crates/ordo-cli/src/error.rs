//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

use ordo_feed::FeedError;
use ordo_sources::FetchError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// No source could produce a requested year.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The feed could not be encoded.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// The feed file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
