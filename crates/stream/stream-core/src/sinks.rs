//! File-backed and in-memory output sinks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use stream_spi::{OutputRecord, OutputSink, Result, StreamError, DATE_FORMAT};

/// Appends one CSV row per result tuple to a file.
///
/// The header row is written on creation; `close` flushes and releases
/// the handle. Dropping an unclosed sink still flushes best-effort, so
/// an aborted run does not lose buffered rows.
pub struct FileOutput {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    rows: u64,
}

impl FileOutput {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .map_err(|e| StreamError::Io(format!("{}: {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "timestamp,actual,prediction,anomaly_score")
            .map_err(|e| StreamError::Io(e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(writer),
            rows: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows written so far (header excluded).
    pub fn rows_written(&self) -> u64 {
        self.rows
    }
}

impl OutputSink for FileOutput {
    fn write(&mut self, record: &OutputRecord) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| StreamError::Sink("write after close".to_string()))?;
        writeln!(
            writer,
            "{},{},{},{}",
            record.timestamp.format(DATE_FORMAT),
            record.actual,
            record.prediction,
            record.anomaly_score
        )
        .map_err(|e| StreamError::Io(e.to_string()))?;
        self.rows += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| StreamError::Io(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for FileOutput {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writer.flush();
        }
    }
}

/// In-memory recorder sink, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryOutput {
    records: Vec<OutputRecord>,
    closed: bool,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[OutputRecord] {
        &self.records
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Consume the sink and take the recorded tuples.
    pub fn into_records(self) -> Vec<OutputRecord> {
        self.records
    }
}

impl OutputSink for MemoryOutput {
    fn write(&mut self, record: &OutputRecord) -> Result<()> {
        if self.closed {
            return Err(StreamError::Sink("write after close".to_string()));
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
