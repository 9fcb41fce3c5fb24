//! Record composition: header context merged into entries, and the footer.

use std::sync::Arc;

use report_pipeline_core::{
    Document, RECORD_TYPE, RecordKind, RecordPair, STAGE_PROCESS_TIME, Sanitiser,
};
use serde_yaml::Value;
use tracing::warn;

use crate::error::{ReportError, Result};
use crate::header::HeaderContext;

/// Builds the raw/sanitised pair for each record kind.
pub(crate) struct RecordComposer {
    header: HeaderContext,
    sanitiser: Arc<dyn Sanitiser>,
}

impl RecordComposer {
    pub(crate) fn new(header: HeaderContext, sanitiser: Arc<dyn Sanitiser>) -> Self {
        Self { header, sanitiser }
    }

    pub(crate) fn header(&self) -> &HeaderContext {
        &self.header
    }

    pub(crate) fn header_pair(&self) -> RecordPair {
        RecordPair {
            sanitised: self.header.sanitised().clone(),
            raw: self.header.raw().clone(),
        }
    }

    /// Composes one entry pair. The header context overrides entry fields
    /// of the same name, and `record_type` is forced last, so the pair
    /// always carries the run-wide `report_id` and kind.
    ///
    /// A missing `test_name` in the sanitised header degrades to a logged
    /// pass-through; a sanitiser failure is fatal.
    pub(crate) fn entry_pair(&self, entry: Document) -> Result<RecordPair> {
        let mut raw = entry.clone();
        raw.merge_over(self.header.raw());
        raw.insert(RECORD_TYPE, RecordKind::Entry.as_str());

        let mut candidate = entry;
        candidate.merge_over(self.header.sanitised());
        candidate.insert(RECORD_TYPE, RecordKind::Entry.as_str());

        let sanitised = match self.header.sanitised_test_name() {
            None => {
                warn!(
                    report_id = %self.header.report_id(),
                    "test_name missing; entry left unsanitised"
                );
                candidate
            }
            Some(test_name) => self
                .sanitiser
                .sanitise_entry(test_name, candidate)
                .map_err(ReportError::Sanitise)?,
        };

        Ok(RecordPair { sanitised, raw })
    }

    /// Composes the footer pair from the header context. Header fields are
    /// already sanitised, so the footer never passes through dispatch.
    pub(crate) fn footer_pair(&self, process_time: Option<f64>) -> RecordPair {
        let time_value = process_time.map(Value::from).unwrap_or(Value::Null);

        let mut raw = self.header.raw().clone();
        let mut sanitised = self.header.sanitised().clone();
        for doc in [&mut raw, &mut sanitised] {
            doc.insert(RECORD_TYPE, RecordKind::Footer.as_str());
            doc.insert(STAGE_PROCESS_TIME, time_value.clone());
        }

        RecordPair { sanitised, raw }
    }
}
