//! Handler registry dispatching entries to per-test-type scrubbing rules.

use std::collections::HashMap;
use std::sync::Arc;

use report_pipeline_core::{Document, SanitiseError, Sanitiser};
use tracing::debug;

use crate::bridge_db::BridgeDb;
use crate::handlers::{BridgeReachability, TcpConnect};

/// Test name handled by [`BridgeReachability`].
pub const BRIDGE_REACHABILITY: &str = "bridge_reachability";
/// Test name handled by [`TcpConnect`].
pub const TCP_CONNECT: &str = "tcp_connect";

/// Scrubbing rules for one measurement test type.
///
/// Handlers own their argument and may mutate it freely; the reader always
/// passes a candidate copy, never the raw record. Implementations must be
/// idempotent.
pub trait TestSanitiser: Send + Sync {
    fn sanitise(&self, entry: Document, bridge_db: &BridgeDb) -> Result<Document, SanitiseError>;
}

/// Runtime dispatch of entries to [`TestSanitiser`]s keyed by test name.
///
/// Entries with a test name no handler claims are passed through unchanged;
/// the miss is recorded as a debug event rather than treated as an error.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use report_pipeline_core::Sanitiser;
/// use report_pipeline_sanitise::{BridgeDb, SanitiserRegistry};
///
/// let registry = SanitiserRegistry::with_defaults(Arc::new(BridgeDb::new()));
/// let entry: report_pipeline_core::Document =
///     serde_yaml::from_str("input: example.org").unwrap();
/// let out = registry.sanitise_entry("web_connectivity", entry.clone()).unwrap();
/// assert_eq!(out, entry);
/// ```
pub struct SanitiserRegistry {
    handlers: HashMap<String, Box<dyn TestSanitiser>>,
    bridge_db: Arc<BridgeDb>,
}

impl SanitiserRegistry {
    /// Registry with no handlers: every entry passes through.
    pub fn new(bridge_db: Arc<BridgeDb>) -> Self {
        Self {
            handlers: HashMap::new(),
            bridge_db,
        }
    }

    /// Registry with the built-in handlers registered.
    pub fn with_defaults(bridge_db: Arc<BridgeDb>) -> Self {
        let mut registry = Self::new(bridge_db);
        registry.register(BRIDGE_REACHABILITY, Box::new(BridgeReachability));
        registry.register(TCP_CONNECT, Box::new(TcpConnect));
        registry
    }

    /// Adds or replaces the handler for a test name.
    pub fn register(&mut self, test_name: impl Into<String>, handler: Box<dyn TestSanitiser>) {
        self.handlers.insert(test_name.into(), handler);
    }

    /// `true` if a handler is registered for the test name.
    pub fn handles(&self, test_name: &str) -> bool {
        self.handlers.contains_key(test_name)
    }
}

impl Sanitiser for SanitiserRegistry {
    fn sanitise_entry(
        &self,
        test_name: &str,
        entry: Document,
    ) -> Result<Document, SanitiseError> {
        match self.handlers.get(test_name) {
            Some(handler) => handler.sanitise(entry, &self.bridge_db),
            None => {
                debug!(test_name, "no sanitisation handler; passing entry through");
                Ok(entry)
            }
        }
    }
}
