//! Line-oriented action log
//!
//! Every primitive the executor issues is described by one line here. The
//! same text is produced whether the primitive is performed or simulated, so
//! the log of a dry run can be diffed against the log of a real one.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{Result, SyncError};

/// Sink for action descriptions
pub trait ActionLog {
    fn write_line(&mut self, line: &str) -> Result<()>;
}

/// Writes lines to standard output
#[derive(Debug, Default)]
pub struct ConsoleLog;

impl ActionLog for ConsoleLog {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}").map_err(|e| SyncError::log_error("<stdout>", e))
    }
}

/// Collects lines in memory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryLog {
    lines: Vec<String>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl ActionLog for MemoryLog {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// Log file, truncated when created.
///
/// Output is buffered; [`FileLog::finish`] flushes and reports errors, and
/// dropping an unfinished log flushes on a best-effort basis.
#[derive(Debug)]
pub struct FileLog {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileLog {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| SyncError::log_error(&path, e))?;
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the file.
    pub fn finish(mut self) -> Result<()> {
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush().map_err(|e| SyncError::log_error(&self.path, e)),
            None => Ok(()),
        }
    }
}

impl ActionLog for FileLog {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            let closed = io::Error::new(io::ErrorKind::Other, "log already closed");
            SyncError::log_error(&self.path, closed)
        })?;
        writeln!(writer, "{line}").map_err(|e| SyncError::log_error(&self.path, e))
    }
}

impl Drop for FileLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush log file: {}", e);
        }
    }
}

/// Current local time in the format used by the start and completion lines
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
