//! Errors surfaced by the command-line tools.

use thiserror::Error;

/// A failed command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad arguments.
    #[error("{0}")]
    Usage(String),

    /// The engine reported an error.
    #[error(transparent)]
    Strongbox(#[from] strongbox_foundation::Error),
}

/// Result type for the command-line tools.
pub type Result<T> = std::result::Result<T, CliError>;
