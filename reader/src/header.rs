//! Header processing: the first document becomes the run-wide context.

use report_pipeline_core::{
    Document, NonceGenerator, RECORD_TYPE, REPORT_FILENAME, REPORT_ID, RecordKind, START_TIME,
    Sanitiser, TEST_NAME, report_date,
};

use crate::error::{ReportError, Result};

/// Context derived once from the header document and merged, not copied,
/// into every subsequent record.
///
/// Invariant: `report_id` is present and non-empty once a context exists.
#[derive(Debug, Clone)]
pub struct HeaderContext {
    raw: Document,
    sanitised: Document,
    report_id: String,
}

impl HeaderContext {
    /// Builds the context from the first document of a report.
    ///
    /// Injects `record_type = "header"` and `report_filename`; generates a
    /// `report_id` (`YYYY-MM-DD` date of `start_time` plus the generator's
    /// suffix) when the input omits one or carries an empty one; runs the
    /// header-sanitisation seam.
    ///
    /// # Errors
    ///
    /// [`ReportError::MissingStartTime`] if a `report_id` must be generated
    /// but `start_time` is absent or non-numeric, or
    /// [`ReportError::Sanitise`] if the header sanitiser rejects the header.
    pub(crate) fn build(
        mut header: Document,
        filename: &str,
        nonce_generator: &dyn NonceGenerator,
        sanitiser: &dyn Sanitiser,
    ) -> Result<Self> {
        header.insert(RECORD_TYPE, RecordKind::Header.as_str());
        header.insert(REPORT_FILENAME, filename);

        let report_id = match header.get_str(REPORT_ID) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let start_time = header
                    .get_f64(START_TIME)
                    .ok_or(ReportError::MissingStartTime)?;
                let date = report_date(start_time).ok_or(ReportError::MissingStartTime)?;
                let id = format!("{date}{}", nonce_generator.nonce());
                header.insert(REPORT_ID, id.as_str());
                id
            }
        };

        let sanitised = sanitiser
            .sanitise_header(header.clone())
            .map_err(ReportError::Sanitise)?;

        Ok(Self {
            raw: header,
            sanitised,
            report_id,
        })
    }

    /// Header document as read, plus the injected fields.
    pub fn raw(&self) -> &Document {
        &self.raw
    }

    /// Header document after the header-sanitisation seam.
    pub fn sanitised(&self) -> &Document {
        &self.sanitised
    }

    /// The run-wide report id. Never empty.
    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    /// Non-empty `test_name` of the sanitised header, if any.
    pub(crate) fn sanitised_test_name(&self) -> Option<&str> {
        self.sanitised.get_str(TEST_NAME).filter(|name| !name.is_empty())
    }
}
