//! The public report iterator: one header pair, every entry pair in input
//! order, one footer pair.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use report_pipeline_core::{
    IdentitySanitiser, NonceGenerator, RandomNonce, RecordPair, Sanitiser,
};
use tracing::error;

use crate::compose::RecordComposer;
use crate::error::{ReportError, Result};
use crate::header::HeaderContext;
use crate::source::ReportSource;
use crate::stream::EntryStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Header,
    Entries,
    Finished,
}

/// A single pass over one report file.
///
/// Constructed over an exclusively owned source; the header document is
/// consumed and processed at construction time, so an unreadable or empty
/// report fails before any record is produced. Iteration then yields the
/// header pair, each entry pair, and finally the footer pair. The iterator
/// is fused: after the footer, or after the first fatal error, it yields
/// `None` forever. Re-processing a file means constructing a new `Report`.
///
/// # Examples
///
/// ```no_run
/// use report_pipeline_reader::Report;
///
/// let report = Report::open_default("measurement.yaml").unwrap();
/// for pair in report {
///     let pair = pair.unwrap();
///     println!("{} {:?}", pair.record_type().unwrap(), pair.report_id());
/// }
/// ```
pub struct Report {
    stream: EntryStream,
    composer: RecordComposer,
    phase: Phase,
    started: Instant,
}

impl Report {
    /// Opens `path` and processes its header document.
    ///
    /// # Errors
    ///
    /// [`ReportError::Io`] if the file cannot be opened or read,
    /// [`ReportError::EmptyReport`] if it contains no documents, or any
    /// header-processing failure from [`HeaderContext`]. Each fatal error
    /// is logged with the source path before being returned.
    pub fn open(
        path: impl AsRef<Path>,
        sanitiser: Arc<dyn Sanitiser>,
        nonce_generator: &dyn NonceGenerator,
    ) -> Result<Self> {
        let path = path.as_ref();
        let source = ReportSource::open(path).map_err(|err| {
            error!(path = %path.display(), error = %err, "failed to open report");
            ReportError::from(err)
        })?;
        let filename = source.filename();
        let mut stream = EntryStream::new(source);

        let header_doc = match stream.next_document_strict() {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                error!(path = %path.display(), "report contains no documents");
                return Err(ReportError::EmptyReport);
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "failed to read report header");
                return Err(err);
            }
        };

        let header = HeaderContext::build(
            header_doc,
            &filename,
            nonce_generator,
            sanitiser.as_ref(),
        )
        .map_err(|err| {
            error!(path = %path.display(), error = %err, "failed to process report header");
            err
        })?;

        Ok(Self {
            stream,
            composer: RecordComposer::new(header, sanitiser),
            phase: Phase::Header,
            started: Instant::now(),
        })
    }

    /// Opens `path` with the no-op sanitiser and the default random
    /// report-id generator.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path, Arc::new(IdentitySanitiser), &RandomNonce)
    }

    /// The immutable header context of this run.
    pub fn header(&self) -> &HeaderContext {
        self.composer.header()
    }

    /// The run-wide report id.
    pub fn report_id(&self) -> &str {
        self.composer.header().report_id()
    }

    /// Cumulative source lines bypassed by resynchronisation so far.
    pub fn skipped_lines(&self) -> u64 {
        self.stream.skipped_lines()
    }

    /// Number of resynchronisations performed so far.
    pub fn recoveries(&self) -> u64 {
        self.stream.recoveries()
    }
}

impl Iterator for Report {
    type Item = Result<RecordPair>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.phase {
            Phase::Header => {
                self.phase = Phase::Entries;
                Some(Ok(self.composer.header_pair()))
            }
            Phase::Entries => match self.stream.next_entry() {
                Ok(Some(entry)) => match self.composer.entry_pair(entry) {
                    Ok(pair) => Some(Ok(pair)),
                    Err(err) => {
                        self.phase = Phase::Finished;
                        error!(
                            path = %self.stream.source().path().display(),
                            error = %err,
                            "failed to process report entry"
                        );
                        Some(Err(err))
                    }
                },
                Ok(None) => {
                    // Natural end of the stream: record the end time and
                    // emit the footer exactly once.
                    self.phase = Phase::Finished;
                    debug_assert!(self.stream.is_done());
                    let elapsed = self.started.elapsed().as_secs_f64();
                    Some(Ok(self.composer.footer_pair(Some(elapsed))))
                }
                // Already logged with full context inside the stream.
                Err(err) => {
                    self.phase = Phase::Finished;
                    Some(Err(err))
                }
            },
            Phase::Finished => None,
        }
    }
}
