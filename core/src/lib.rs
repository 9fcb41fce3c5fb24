//! Core document model and shared primitives for report processing.
//!
//! This crate defines the foundational types for the report sanitisation
//! pipeline:
//!
//! - [`Document`] — one decoded report document: an open field bag with
//!   typed accessors for the handful of fields the pipeline interprets.
//! - [`RecordKind`] / [`RecordPair`] — the header/entry/footer record kinds
//!   and the sanitised/raw pair emitted for each of them.
//! - [`NonceGenerator`] — injectable suffix source for generated report ids
//!   ([`RandomNonce`] in production, [`FixedNonce`] in tests).
//! - [`Sanitiser`] — the seam behind which the concrete privacy-scrubbing
//!   rules live; [`IdentitySanitiser`] is the no-op implementation.
//!
//! # Example
//!
//! ```
//! use report_pipeline_core::{Document, RECORD_TYPE, RecordKind};
//!
//! let mut entry: Document = serde_yaml::from_str("input: example.org").unwrap();
//! entry.insert(RECORD_TYPE, RecordKind::Entry.as_str());
//!
//! assert_eq!(entry.get_str(RECORD_TYPE), Some("entry"));
//! assert_eq!(entry.get_str("input"), Some("example.org"));
//! ```

mod document;
mod idgen;
mod record;
mod sanitise;

pub use document::Document;
pub use idgen::{FixedNonce, NONCE_LEN, NonceGenerator, RandomNonce, report_date};
pub use record::{
    RECORD_TYPE, REPORT_FILENAME, REPORT_ID, RecordKind, RecordPair, STAGE_PROCESS_TIME,
    START_TIME, TEST_NAME,
};
pub use sanitise::{IdentitySanitiser, SanitiseError, Sanitiser};
