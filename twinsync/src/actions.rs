//! The four filesystem primitives, performed or only described
//!
//! [`PerformActions`] touches the filesystem and then logs; [`SimulateActions`]
//! only logs. Both produce exactly the same line for the same call.

use std::fmt;
use std::fs;
use std::path::Path;

use filetime::FileTime;

use crate::error::{Result, SyncError};
use crate::log::ActionLog;

/// Whether a run changes the filesystem or only describes what it would do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Execute,
    Simulate,
}

impl Mode {
    /// Build the executor for this mode, writing to `log`.
    pub fn actioner<'a>(self, log: &'a mut dyn ActionLog) -> Box<dyn Actioner + 'a> {
        match self {
            Mode::Execute => Box::new(PerformActions::new(log)),
            Mode::Simulate => Box::new(SimulateActions::new(log)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Execute => write!(f, "execute"),
            Mode::Simulate => write!(f, "simulate"),
        }
    }
}

/// Lowest-level filesystem operations
pub trait Actioner {
    /// Copy a single file; `to` must not be a directory.
    fn copy(&mut self, from: &Path, to: &Path) -> Result<()>;
    fn delete_file(&mut self, path: &Path) -> Result<()>;
    /// Remove an empty directory.
    fn delete_dir(&mut self, path: &Path) -> Result<()>;
    /// Create one directory; its parent must already exist.
    fn create_dir(&mut self, path: &Path) -> Result<()>;
}

pub(crate) fn describe_copy(from: &Path, to: &Path) -> String {
    format!("Copied '{}' -> '{}'", from.display(), to.display())
}

pub(crate) fn describe_delete_file(path: &Path) -> String {
    format!("Deleted file '{}'", path.display())
}

pub(crate) fn describe_delete_dir(path: &Path) -> String {
    format!("Deleted dir '{}'", path.display())
}

pub(crate) fn describe_create_dir(path: &Path) -> String {
    format!("Created dir '{}'", path.display())
}

/// Only logs
pub struct SimulateActions<'a> {
    log: &'a mut dyn ActionLog,
}

impl<'a> SimulateActions<'a> {
    pub fn new(log: &'a mut dyn ActionLog) -> Self {
        Self { log }
    }
}

impl Actioner for SimulateActions<'_> {
    fn copy(&mut self, from: &Path, to: &Path) -> Result<()> {
        self.log.write_line(&describe_copy(from, to))
    }

    fn delete_file(&mut self, path: &Path) -> Result<()> {
        self.log.write_line(&describe_delete_file(path))
    }

    fn delete_dir(&mut self, path: &Path) -> Result<()> {
        self.log.write_line(&describe_delete_dir(path))
    }

    fn create_dir(&mut self, path: &Path) -> Result<()> {
        self.log.write_line(&describe_create_dir(path))
    }
}

/// Touches the filesystem, then logs what it did
pub struct PerformActions<'a> {
    log: &'a mut dyn ActionLog,
}

impl<'a> PerformActions<'a> {
    pub fn new(log: &'a mut dyn ActionLog) -> Self {
        Self { log }
    }
}

impl Actioner for PerformActions<'_> {
    fn copy(&mut self, from: &Path, to: &Path) -> Result<()> {
        tracing::debug!(from = %from.display(), to = %to.display(), "copy");
        fs::copy(from, to).map_err(|e| SyncError::copy_error(from, to, e))?;

        // The copy must carry the source's mtime or the pair would never
        // compare equal afterwards.
        let metadata = fs::metadata(from).map_err(|e| SyncError::io_error(from, e))?;
        filetime::set_file_mtime(to, FileTime::from_last_modification_time(&metadata))
            .map_err(|e| SyncError::io_error(to, e))?;

        self.log.write_line(&describe_copy(from, to))
    }

    fn delete_file(&mut self, path: &Path) -> Result<()> {
        tracing::debug!(path = %path.display(), "delete file");
        fs::remove_file(path).map_err(|e| SyncError::io_error(path, e))?;
        self.log.write_line(&describe_delete_file(path))
    }

    fn delete_dir(&mut self, path: &Path) -> Result<()> {
        tracing::debug!(path = %path.display(), "delete dir");
        fs::remove_dir(path).map_err(|e| SyncError::io_error(path, e))?;
        self.log.write_line(&describe_delete_dir(path))
    }

    fn create_dir(&mut self, path: &Path) -> Result<()> {
        tracing::debug!(path = %path.display(), "create dir");
        fs::create_dir(path).map_err(|e| SyncError::io_error(path, e))?;
        self.log.write_line(&describe_create_dir(path))
    }
}
