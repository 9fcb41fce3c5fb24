//! Exclusive handle on an opened report file.
//!
//! The reader owns the file for the whole run and is the only component
//! allowed to read or seek it. Recovery is the one consumer of backward
//! seeking: it rewinds to the start and discards the lines already bypassed.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// An opened, seekable report file with line-granular reads.
#[derive(Debug)]
pub struct ReportSource {
    path: PathBuf,
    reader: BufReader<File>,
}

impl ReportSource {
    /// Opens the report at `path` for exclusive sequential reading.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Ok(Self {
            path,
            reader: BufReader::new(file),
        })
    }

    /// Filesystem path the source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the source path, recorded in the header as
    /// `report_filename`.
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Reads one line including its terminator. `Ok(None)` at end of input.
    pub(crate) fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        match self.reader.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }

    /// Rewinds to the beginning of the file.
    pub(crate) fn seek_to_start(&mut self) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Reads and drops `count` lines. Stops early at end of input.
    pub(crate) fn discard_lines(&mut self, count: u64) -> io::Result<()> {
        for _ in 0..count {
            if self.read_line()?.is_none() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn source_with(content: &str) -> (tempfile::TempDir, ReportSource) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.yaml");
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, ReportSource::open(&path).unwrap())
    }

    #[test]
    fn test_filename_is_base_name() {
        let (_dir, source) = source_with("a: 1\n");
        assert_eq!(source.filename(), "report.yaml");
    }

    #[test]
    fn test_read_line_to_eof() {
        let (_dir, mut source) = source_with("one\ntwo\n");
        assert_eq!(source.read_line().unwrap().as_deref(), Some("one\n"));
        assert_eq!(source.read_line().unwrap().as_deref(), Some("two\n"));
        assert_eq!(source.read_line().unwrap(), None);
    }

    #[test]
    fn test_seek_and_discard() {
        let (_dir, mut source) = source_with("one\ntwo\nthree\n");
        assert_eq!(source.read_line().unwrap().as_deref(), Some("one\n"));

        source.seek_to_start().unwrap();
        source.discard_lines(2).unwrap();
        assert_eq!(source.read_line().unwrap().as_deref(), Some("three\n"));
    }

    #[test]
    fn test_discard_past_eof_is_not_an_error() {
        let (_dir, mut source) = source_with("one\n");
        source.discard_lines(10).unwrap();
        assert_eq!(source.read_line().unwrap(), None);
    }
}
