//! File transport implementation

use crate::core::{Result, TraceError, Transport};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes raw records to a file opened once for the process lifetime.
///
/// The file is truncated on open; it holds the current run's trace. Records
/// are written without a separator.
pub struct FileTransport {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileTransport {
    /// Path used when no `TRACEFILE` is configured
    pub const DEFAULT_PATH: &'static str = "output.txt";

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| {
                TraceError::io_operation(
                    "opening trace file",
                    format!("cannot open '{}'", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Transport for FileTransport {
    fn write(&mut self, record: &str) -> Result<()> {
        self.writer.write_all(record.as_bytes()).map_err(|e| {
            TraceError::io_operation(
                "writing trace file",
                format!("cannot write to '{}'", self.path.display()),
                e,
            )
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileTransport {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
