//! Streaming reader for multi-document measurement reports.
//!
//! A report file is a sequence of YAML documents: a header, zero or more
//! entries, and an implicit footer synthesized after exhaustion. This crate
//! turns one such file into a lazy stream of sanitised/raw
//! [`RecordPair`](report_pipeline_core::RecordPair)s:
//!
//! - [`Report`] — the public entry point: a single-pass iterator yielding
//!   the header pair, each entry pair in input order, and the footer pair.
//! - [`ReportSource`] — exclusive handle on the opened file with the
//!   line-granular reads and backward seeking that recovery needs.
//! - [`resume_offset`] — the resume-point arithmetic used when a malformed
//!   document is skipped.
//!
//! The distinguishing behavior is error-tolerant resynchronisation: a YAML
//! syntax error that carries a line number does not abort the stream.
//! The reader rewinds the source, discards the damaged lines, and resumes
//! parsing in a fresh session without dropping already-parsed entries or
//! re-deriving the header context. Errors without location information, and
//! any non-syntax failure, abort the stream after being logged with the
//! source path.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use report_pipeline_core::{IdentitySanitiser, RandomNonce};
//! use report_pipeline_reader::Report;
//!
//! let report = Report::open("report.yaml", Arc::new(IdentitySanitiser), &RandomNonce)?;
//! for pair in report {
//!     let pair = pair?;
//!     println!("{}: {}", pair.record_type().unwrap_or("?"), pair.raw.to_json().unwrap());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod compose;
mod error;
mod header;
mod recover;
mod report;
mod source;
mod stream;

pub use error::{ReportError, Result};
pub use header::HeaderContext;
pub use recover::resume_offset;
pub use report::Report;
pub use source::ReportSource;
