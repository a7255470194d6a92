//! Error types for stock analysis.
//!
//! Library functions return [`Result`], whose error side is
//! [`AnalysisError`]. The binary wraps these in `anyhow` at the top level.
//!
//! ## Fail fast
//!
//! Nothing here recovers from bad input. A missing column, a malformed cell
//! or an empty file ends the run with an error that names the offending row
//! and column:
//!
//! ```
//! use stock_sampler::error::AnalysisError;
//!
//! let err = AnalysisError::InvalidRecord {
//!     row: 4,
//!     column: "estoque".to_owned(),
//!     message: "not a number: 'abc'".to_owned(),
//! };
//! assert_eq!(
//!     err.to_string(),
//!     "Invalid record at row 4, column 'estoque': not a number: 'abc'"
//! );
//! ```
//!
//! ## Context Extension Trait
//!
//! [`ResultExt`] adds `.context()` to any result whose error converts into
//! [`AnalysisError`]:
//!
//! ```no_run
//! use stock_sampler::error::ResultExt as _;
//!
//! fn read_input() -> stock_sampler::error::Result<String> {
//!     std::fs::read_to_string("estoque.csv").context("Failed to read stock file")
//! }
//! ```

use std::fmt;

/// Main error type for stock analysis operations.
#[derive(Debug)]
pub enum AnalysisError {
    /// I/O errors (missing input file, unreadable config, etc.)
    Io(std::io::Error),

    /// Data processing errors (Polars, type casts, etc.)
    DataProcessing(String),

    /// A single row failed validation
    InvalidRecord {
        row: usize,
        column: String,
        message: String,
    },

    /// A required column is absent from the input
    MissingColumn(String),

    /// Configuration errors
    Config(String),

    /// The input has a header but no rows
    EmptyDataset,

    /// Generic error with context
    Other(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::InvalidRecord {
                row,
                column,
                message,
            } => write!(f, "Invalid record at row {row}, column '{column}': {message}"),
            Self::MissingColumn(name) => write!(f, "Missing required column '{name}'"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::EmptyDataset => write!(f, "Dataset contains no records"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for AnalysisError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AnalysisError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: AnalysisError = e.into();
            AnalysisError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: AnalysisError = e.into();
            AnalysisError::Other(format!("{}: {}", f(), err))
        })
    }
}
