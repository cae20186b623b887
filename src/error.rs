//! Error types for blocklex

use thiserror::Error;

/// Result type alias for blocklex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building the rule table, reading configuration,
/// or loading documents. Highlighting itself never fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Unknown style class: {0}")]
    UnknownStyle(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
