//! Privacy scrubbing for measurement report entries.
//!
//! This crate implements the sanitisation side of the pipeline: the
//! [`SanitiserRegistry`] dispatches each entry to the scrubbing rules for
//! its test type, consulting a [`BridgeDb`] to replace bridge endpoints
//! with hashed fingerprints.
//!
//! The registry implements the
//! [`Sanitiser`](report_pipeline_core::Sanitiser) trait, so it plugs
//! directly into the reader:
//!
//! ```no_run
//! use std::sync::Arc;
//! use report_pipeline_sanitise::{BridgeDb, SanitiserRegistry};
//!
//! let db = Arc::new(BridgeDb::from_path("bridge_db.json").unwrap());
//! let registry: Arc<dyn report_pipeline_core::Sanitiser> =
//!     Arc::new(SanitiserRegistry::with_defaults(db));
//! ```
//!
//! Test names with no registered handler pass through unchanged; adding a
//! new test type means implementing [`TestSanitiser`] and registering it.

mod bridge_db;
mod dispatch;
mod error;
mod handlers;

pub use bridge_db::{BridgeDb, BridgeEntry};
pub use dispatch::{BRIDGE_REACHABILITY, SanitiserRegistry, TCP_CONNECT, TestSanitiser};
pub use error::{BridgeDbError, Result};
pub use handlers::{BridgeReachability, TcpConnect};
