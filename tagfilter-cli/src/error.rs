//! CLI error types and result alias.

use miette::Diagnostic;
use thiserror::Error;

use tagfilter_query::FilterError;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(tagfilter::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(tagfilter::config))]
    Config(String),

    /// Model description error
    #[error("Model error: {0}")]
    #[diagnostic(code(tagfilter::model))]
    Model(String),

    /// Filter compilation error
    #[error("Filter error: {0}")]
    #[diagnostic(code(tagfilter::filter))]
    Filter(#[from] FilterError),

    /// Output serialization error
    #[error("Output error: {0}")]
    #[diagnostic(code(tagfilter::output))]
    Output(String),
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(format!("Failed to parse TOML: {}", err))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        CliError::Config(format!("Failed to serialize TOML: {}", err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output(format!("Failed to serialize JSON: {}", err))
    }
}
