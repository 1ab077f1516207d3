//! Error types for parsing and record validation.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing a source file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is empty: {0}")]
    EmptyFile(PathBuf),

    #[error("Unsupported language for {0}")]
    UnsupportedLanguage(PathBuf),

    #[error("Parser error: {0}")]
    ParserError(String),
}

impl ParseError {
    /// Wraps an I/O error with the path that caused it.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A record that failed its shape checks.
///
/// Raised at the ingestion boundary, before the store is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {record} record: {field} {reason}")]
pub struct ValidationError {
    /// Which record kind was rejected ("type", "member", "relationship").
    pub record: &'static str,
    /// The offending field.
    pub field: &'static str,
    /// What was wrong with it.
    pub reason: &'static str,
}

impl ValidationError {
    pub(crate) fn new(record: &'static str, field: &'static str, reason: &'static str) -> Self {
        Self {
            record,
            field,
            reason,
        }
    }
}
