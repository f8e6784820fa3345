//! Errors raised while reading or writing traffic map tables.

use camino::Utf8PathBuf;
use thiserror::Error;
use trafficmap_core::BandwidthError;

/// Errors returned by the table loaders and exporters.
///
/// Malformed individual rows are not errors: loaders skip them and log a
/// warning. These variants cover problems with a table as a whole.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The input file could not be opened.
    #[error("failed to open {path}")]
    Open {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The CSV stream could not be decoded.
    #[error("failed to read CSV from {path}")]
    Csv {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying decoder failure.
        #[source]
        source: csv::Error,
    },
    /// A required column is absent from the header row.
    #[error("{path} has no `{column}` column")]
    MissingColumn {
        /// Offending path.
        path: Utf8PathBuf,
        /// Name of the missing column.
        column: String,
    },
    /// A cell that must be numeric could not be parsed.
    #[error("{path} row {row}: `{column}` value {value:?} is not a finite number")]
    InvalidNumber {
        /// Offending path.
        path: Utf8PathBuf,
        /// One-based data row, not counting the header.
        row: usize,
        /// Column holding the cell.
        column: String,
        /// Raw cell contents.
        value: String,
    },
    /// The bandwidth table does not form a valid series.
    #[error("{path} does not hold a usable bandwidth series")]
    Bandwidth {
        /// Offending path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: BandwidthError,
    },
    /// An output file could not be created or written.
    #[error("failed to write {path}")]
    Write {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying writer failure.
        #[source]
        source: csv::Error,
    },
}
