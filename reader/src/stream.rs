//! Entry stream controller: sequential document decoding with
//! error-tolerant resynchronisation.
//!
//! Documents are decoded one parse session at a time. A session starts at
//! the source's current position and counts lines from 0; when a document
//! fails to decode with a known line, the controller computes a new resume
//! offset with [`resume_offset`], rewinds the source, discards the bypassed
//! lines, and opens a fresh session. Already-yielded documents are never
//! re-read and the header context is never re-derived.

use report_pipeline_core::Document;
use serde_yaml::Value;
use tracing::{debug, error};

use crate::error::{ReportError, Result};
use crate::recover::resume_offset;
use crate::source::ReportSource;

/// Outcome of decoding one document slot in the current session.
enum DocOutcome {
    /// A non-empty mapping document.
    Document(Document),
    /// A blank, comment-only, or null document. Discarded without emission.
    Empty,
    /// End of input.
    Eof,
}

/// Why a document slot failed to decode.
enum ReadFailure {
    /// Located syntax error; recoverable by resynchronisation.
    Syntax {
        /// Session-relative line of the error, starting at 0.
        line: u64,
        source: serde_yaml::Error,
    },
    /// Everything else. Aborts the stream.
    Fatal(ReportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Reading,
    Done,
    Failed,
}

/// Pull-based document stream over one report source.
pub(crate) struct EntryStream {
    source: ReportSource,
    state: StreamState,
    /// Lines consumed in the current parse session.
    session_line: u64,
    /// Cumulative lines permanently bypassed by recoveries. Monotone.
    skipped_lines: u64,
    /// Number of resynchronisations performed.
    recoveries: u64,
}

impl EntryStream {
    pub(crate) fn new(source: ReportSource) -> Self {
        Self {
            source,
            state: StreamState::Reading,
            session_line: 0,
            skipped_lines: 0,
            recoveries: 0,
        }
    }

    pub(crate) fn source(&self) -> &ReportSource {
        &self.source
    }

    pub(crate) fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }

    pub(crate) fn recoveries(&self) -> u64 {
        self.recoveries
    }

    pub(crate) fn is_done(&self) -> bool {
        self.state == StreamState::Done
    }

    /// Next entry document, transparently resynchronising past malformed
    /// documents. `Ok(None)` once the source is exhausted.
    pub(crate) fn next_entry(&mut self) -> Result<Option<Document>> {
        loop {
            if self.state != StreamState::Reading {
                return Ok(None);
            }
            match self.next_document() {
                Ok(DocOutcome::Document(doc)) => return Ok(Some(doc)),
                Ok(DocOutcome::Empty) => continue,
                Ok(DocOutcome::Eof) => {
                    self.state = StreamState::Done;
                    return Ok(None);
                }
                Err(ReadFailure::Syntax { line, source }) => {
                    debug!(
                        path = %self.source.path().display(),
                        line,
                        error = %source,
                        "resynchronising past malformed document"
                    );
                    if let Err(err) = self.recover(line) {
                        self.state = StreamState::Failed;
                        error!(
                            path = %self.source.path().display(),
                            error = %err,
                            "failed to resynchronise report stream"
                        );
                        return Err(err);
                    }
                }
                Err(ReadFailure::Fatal(err)) => {
                    self.state = StreamState::Failed;
                    error!(
                        path = %self.source.path().display(),
                        error = %err,
                        "failed to read report document"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Reads the next document without resynchronisation. Used for the
    /// header, before any recovery context exists: a malformed header is
    /// fatal.
    pub(crate) fn next_document_strict(&mut self) -> Result<Option<Document>> {
        loop {
            match self.next_document() {
                Ok(DocOutcome::Document(doc)) => return Ok(Some(doc)),
                Ok(DocOutcome::Empty) => continue,
                Ok(DocOutcome::Eof) => {
                    self.state = StreamState::Done;
                    return Ok(None);
                }
                Err(ReadFailure::Syntax { line, source }) => {
                    self.state = StreamState::Failed;
                    return Err(ReportError::Syntax { line, source });
                }
                Err(ReadFailure::Fatal(err)) => {
                    self.state = StreamState::Failed;
                    return Err(err);
                }
            }
        }
    }

    /// Computes the new resume offset, rewinds the source, and opens a
    /// fresh parse session just past the bypassed lines.
    fn recover(&mut self, reported_line: u64) -> Result<()> {
        self.skipped_lines = resume_offset(reported_line, self.skipped_lines);
        self.source.seek_to_start()?;
        self.source.discard_lines(self.skipped_lines)?;
        self.session_line = 0;
        self.recoveries += 1;
        Ok(())
    }

    /// Assembles the next document chunk (up to a `---` delimiter, a `...`
    /// terminator, or end of input) and decodes it.
    fn next_document(&mut self) -> std::result::Result<DocOutcome, ReadFailure> {
        let mut chunk = String::new();
        let mut chunk_start = 0;

        loop {
            let line = self
                .source
                .read_line()
                .map_err(|err| ReadFailure::Fatal(err.into()))?;
            let Some(text) = line else {
                if chunk.is_empty() {
                    return Ok(DocOutcome::Eof);
                }
                break;
            };

            let line_no = self.session_line;
            self.session_line += 1;

            if is_boundary_line(&text) {
                if chunk.is_empty() {
                    // Delimiter before any content: document boundary only.
                    continue;
                }
                break;
            }

            if chunk.is_empty() {
                chunk_start = line_no;
            }
            chunk.push_str(&text);
        }

        self.decode_chunk(&chunk, chunk_start)
    }

    fn decode_chunk(
        &self,
        chunk: &str,
        chunk_start: u64,
    ) -> std::result::Result<DocOutcome, ReadFailure> {
        // Blank and comment-only chunks decode to nothing.
        let only_noise = chunk
            .lines()
            .all(|line| line.trim().is_empty() || line.trim_start().starts_with('#'));
        if only_noise {
            return Ok(DocOutcome::Empty);
        }

        let value: Value = match serde_yaml::from_str(chunk) {
            Ok(value) => value,
            Err(err) => {
                return match err.location() {
                    // Locations are 1-based within the chunk; session lines
                    // are 0-based from the session start.
                    Some(location) => Err(ReadFailure::Syntax {
                        line: chunk_start + (location.line() as u64).saturating_sub(1),
                        source: err,
                    }),
                    None => Err(ReadFailure::Fatal(ReportError::UnlocatedSyntax(err))),
                };
            }
        };

        match value {
            Value::Null => Ok(DocOutcome::Empty),
            Value::Mapping(_) => match serde_yaml::from_value::<Document>(value) {
                Ok(doc) if doc.is_empty() => Ok(DocOutcome::Empty),
                Ok(doc) => Ok(DocOutcome::Document(doc)),
                Err(err) => Err(ReadFailure::Fatal(ReportError::InvalidDocument(format!(
                    "mapping with non-string keys: {err}"
                )))),
            },
            other => Err(ReadFailure::Fatal(ReportError::InvalidDocument(format!(
                "document is not a mapping (found {})",
                value_kind(&other)
            )))),
        }
    }
}

/// `true` for a `---` delimiter or `...` terminator line. YAML recognises
/// these markers only at column 0; an indented marker inside a block scalar
/// is ordinary content. Trailing whitespace and comments are tolerated.
fn is_boundary_line(line: &str) -> bool {
    let Some(rest) = line.strip_prefix("---").or_else(|| line.strip_prefix("...")) else {
        return false;
    };
    let rest = rest.trim();
    rest.is_empty() || rest.starts_with('#')
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn stream_over(content: &str) -> (tempfile::TempDir, EntryStream) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stream.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, EntryStream::new(ReportSource::open(&path).unwrap()))
    }

    #[test]
    fn test_documents_in_order() {
        let (_dir, mut stream) = stream_over("---\ninput: a\n---\ninput: b\n");
        assert_eq!(
            stream.next_entry().unwrap().unwrap().get_str("input"),
            Some("a")
        );
        assert_eq!(
            stream.next_entry().unwrap().unwrap().get_str("input"),
            Some("b")
        );
        assert!(stream.next_entry().unwrap().is_none());
        assert!(stream.is_done());
        assert_eq!(stream.recoveries(), 0);
    }

    #[test]
    fn test_empty_documents_are_discarded() {
        let (_dir, mut stream) = stream_over("---\n---\n# noise\n---\ninput: a\n---\n...\n");
        assert_eq!(
            stream.next_entry().unwrap().unwrap().get_str("input"),
            Some("a")
        );
        assert!(stream.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_terminator_ends_a_document() {
        let (_dir, mut stream) = stream_over("input: a\n...\ninput: b\n");
        assert_eq!(
            stream.next_entry().unwrap().unwrap().get_str("input"),
            Some("a")
        );
        assert_eq!(
            stream.next_entry().unwrap().unwrap().get_str("input"),
            Some("b")
        );
        assert!(stream.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_boundary_markers_only_at_column_zero() {
        assert!(is_boundary_line("---\n"));
        assert!(is_boundary_line("...\n"));
        assert!(is_boundary_line("---   \n"));
        assert!(is_boundary_line("--- # end of document\n"));
        assert!(!is_boundary_line("  ---\n"));
        assert!(!is_boundary_line("\t...\n"));
        assert!(!is_boundary_line("---three: dashes\n"));
    }

    #[test]
    fn test_indented_marker_inside_block_scalar_is_content() {
        let (_dir, mut stream) = stream_over(
            "---\n\
             input: a\n\
             logs: |\n\
             \x20\x20first\n\
             \x20\x20---\n\
             \x20\x20second\n\
             ---\n\
             input: b\n",
        );
        let doc = stream.next_entry().unwrap().unwrap();
        assert_eq!(doc.get_str("input"), Some("a"));
        assert_eq!(doc.get_str("logs"), Some("first\n---\nsecond\n"));
        assert_eq!(
            stream.next_entry().unwrap().unwrap().get_str("input"),
            Some("b")
        );
        assert!(stream.next_entry().unwrap().is_none());
        assert_eq!(stream.recoveries(), 0);
    }

    #[test]
    fn test_recovery_skips_damaged_lines() {
        // Lines 0-1 hold a valid document; the document starting at line 3
        // is damaged: the mapping value at line 5 follows a plain scalar.
        // Resynchronisation must land past the damage and still decode the
        // final document.
        let (_dir, mut stream) = stream_over(
            "---\n\
             input: a\n\
             ---\n\
             input: broken\n\
             bad\n\
             more: x\n\
             ---\n\
             input: c\n",
        );
        assert_eq!(
            stream.next_entry().unwrap().unwrap().get_str("input"),
            Some("a")
        );
        assert_eq!(
            stream.next_entry().unwrap().unwrap().get_str("input"),
            Some("c")
        );
        assert!(stream.next_entry().unwrap().is_none());
        assert_eq!(stream.recoveries(), 1);
        // Error reported at session line 5, no prior skips: 5 + 0 + 1.
        assert_eq!(stream.skipped_lines(), 6);
    }

    #[test]
    fn test_skipped_lines_accumulate_across_recoveries() {
        let (_dir, mut stream) = stream_over(
            "---\n\
             input: broken\n\
             bad\n\
             more: x\n\
             ---\n\
             input: also broken\n\
             worse\n\
             again: y\n\
             ---\n\
             input: c\n",
        );
        assert_eq!(
            stream.next_entry().unwrap().unwrap().get_str("input"),
            Some("c")
        );
        assert!(stream.next_entry().unwrap().is_none());
        assert_eq!(stream.recoveries(), 2);
        assert!(stream.skipped_lines() > 0);
    }

    #[test]
    fn test_non_mapping_document_is_fatal() {
        let (_dir, mut stream) = stream_over("---\n- just\n- a list\n");
        let err = stream.next_entry().unwrap_err();
        assert!(matches!(err, ReportError::InvalidDocument(_)));
        // Terminal: no further reads are attempted.
        assert!(stream.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_eof_on_empty_input() {
        let (_dir, mut stream) = stream_over("");
        assert!(stream.next_entry().unwrap().is_none());
        assert!(stream.is_done());
    }

    #[test]
    fn test_strict_read_fails_on_malformed_document() {
        let (_dir, mut stream) = stream_over("input: broken\nbad\nmore: x\n");
        let err = stream.next_document_strict().unwrap_err();
        assert!(matches!(err, ReportError::Syntax { .. }));
    }
}
