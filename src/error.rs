//! Error types for the bibfolio crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type for bibfolio operations
pub type Result<T> = std::result::Result<T, Error>;

/// The error type shared by the parser, the database, and the page renderer
#[derive(Error, Debug)]
pub enum Error {
    /// Input that is not syntactically valid BibTeX
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        /// Line number (1-indexed)
        line: usize,
        /// Column number (1-indexed)
        column: usize,
        /// What went wrong
        message: String,
        /// Source excerpt around the failure
        snippet: Option<String>,
    },

    /// A `@string` reference with no definition (strict expansion only)
    #[error("Undefined string variable '{0}'")]
    UndefinedVariable(String),

    /// `@string` definitions that refer to each other in a cycle
    #[error("Circular reference in string variables: {0}")]
    CircularReference(String),

    /// Unreadable or syntactically invalid pages configuration
    #[error("Invalid configuration {}: {source}", .path.display())]
    Config {
        /// The configuration file that failed to load
        path: PathBuf,
        /// The underlying JSON error
        source: serde_json::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
