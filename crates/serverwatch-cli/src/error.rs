//! CLI error types.

use serverwatch_core::{ConfigError, ReportError, ServerId};
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid gateway configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The action ended in an error view state.
    #[error("{0}")]
    Action(String),

    /// The requested server is not in the loaded collection.
    #[error("server not found: {0}")]
    ServerNotFound(ServerId),

    /// Report export failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
