//! Error types for report reading and processing.
//!
//! Recoverable YAML errors (those carrying a source line) never surface
//! here: they are absorbed by the entry stream's resynchronisation. Every
//! variant below is fatal for the remaining stream.

use report_pipeline_core::SanitiseError;
use thiserror::Error;

/// Errors that abort report processing.
#[derive(Debug, Error)]
pub enum ReportError {
    /// File I/O failure while reading or seeking the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source yielded no documents at all.
    #[error("report contains no documents")]
    EmptyReport,

    /// A `report_id` had to be generated but the header has no usable
    /// numeric `start_time` to derive the date part from.
    #[error("header has no usable start_time to derive a report_id")]
    MissingStartTime,

    /// A document decoded successfully but is not usable as a record
    /// (e.g. not a mapping, or keyed by non-strings).
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// YAML syntax error in a position where resynchronisation is not
    /// available (the header document).
    #[error("YAML syntax error at line {line}: {source}")]
    Syntax {
        /// Session-relative source line of the error, starting at 0.
        line: u64,
        source: serde_yaml::Error,
    },

    /// YAML syntax error carrying no location information, so no resume
    /// point can be computed.
    #[error("YAML syntax error without location: {0}")]
    UnlocatedSyntax(#[source] serde_yaml::Error),

    /// The sanitiser rejected an entry. Never retried.
    #[error("sanitisation failed: {0}")]
    Sanitise(SanitiseError),
}

/// Convenience alias for results with [`ReportError`].
pub type Result<T> = std::result::Result<T, ReportError>;
