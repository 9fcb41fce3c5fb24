//! Record kinds, record pairs, and the interpreted field names.

use serde::{Deserialize, Serialize};

use crate::Document;

/// Field injected into every record identifying its kind.
pub const RECORD_TYPE: &str = "record_type";
/// Report identifier shared by all records of one run.
pub const REPORT_ID: &str = "report_id";
/// Base name of the source report file, injected into the header.
pub const REPORT_FILENAME: &str = "report_filename";
/// Header field: measurement start, numeric epoch seconds.
pub const START_TIME: &str = "start_time";
/// Header field selecting the sanitisation handler.
pub const TEST_NAME: &str = "test_name";
/// Footer field: wall-clock seconds spent processing the report.
pub const STAGE_PROCESS_TIME: &str = "stage_process_time";

/// The three record kinds flowing through a report stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// First record, one per report; carries run-wide context.
    Header,
    /// One per measurement document, in input order.
    Entry,
    /// Exactly one, synthesized after input exhaustion.
    Footer,
}

impl RecordKind {
    /// Wire name stored in the `record_type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Entry => "entry",
            Self::Footer => "footer",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sanitised/raw pair produced for every logical record.
///
/// Both sides always share the same `record_type` and `report_id`; the raw
/// side keeps the original field values, the sanitised side has had the
/// test-type scrubbing rules applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPair {
    pub sanitised: Document,
    pub raw: Document,
}

impl RecordPair {
    /// The shared `record_type` of the pair, read from the raw side.
    pub fn record_type(&self) -> Option<&str> {
        self.raw.get_str(RECORD_TYPE)
    }

    /// The shared `report_id` of the pair, read from the raw side.
    pub fn report_id(&self) -> Option<&str> {
        self.raw.get_str(REPORT_ID)
    }
}
