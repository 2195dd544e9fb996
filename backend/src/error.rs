//! Error types for the Tally counting service.
//!
//! - [`CsvError`] - CSV decoding and parsing errors
//! - [`DatasetError`] - Dataset load errors
//! - [`ConfigError`] - Startup configuration errors
//! - [`ServerError`] - Top-level startup/serving errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read input.
    #[error("Failed to read CSV: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid CSV format.
    #[error("Invalid CSV at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// Header row present but has no usable column names.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CsvError::Io(io),
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => CsvError::ParseError {
                line,
                message: format!("expected {} fields, found {}", expected_len, len),
            },
            csv::ErrorKind::Utf8 { err, .. } => CsvError::ParseError {
                line,
                message: err.to_string(),
            },
            other => CsvError::ParseError {
                line,
                message: format!("{:?}", other),
            },
        }
    }
}

// =============================================================================
// Dataset Errors
// =============================================================================

/// Errors while loading a [`crate::Dataset`].
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The source file could not be opened or read.
    #[error("Cannot read dataset '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// The CSV parsed but cannot form a dataset.
    #[error("Malformed dataset: {0}")]
    Malformed(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while resolving startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Delimiter must be a single ASCII character.
    #[error("Invalid delimiter '{0}': expected a single ASCII character or 'tab'")]
    InvalidDelimiter(String),
}

// =============================================================================
// Server Errors
// =============================================================================

/// Startup and serving errors. Any of these aborts the process.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Dataset failed to load.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Listener could not bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> DatasetError -> ServerError
        let dataset_err: DatasetError = CsvError::EmptyFile.into();
        assert!(dataset_err.to_string().contains("empty"));

        let server_err: ServerError = dataset_err.into();
        assert!(server_err.to_string().starts_with("Dataset error"));
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = DatasetError::Io {
            path: PathBuf::from("data/missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("data/missing.csv"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_parse_error_format() {
        let err = CsvError::ParseError {
            line: 4,
            message: "expected 2 fields, found 3".into(),
        };
        assert_eq!(err.to_string(), "Invalid CSV at line 4: expected 2 fields, found 3");
    }
}
