//! Error types for the twinsync engine

use std::path::{Path, PathBuf};

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Everything that can stop a run.
///
/// None of these are caught inside the engine: a failing filesystem primitive
/// aborts the run and leaves both trees as the preceding operations left them.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Listing, metadata, delete or create failure
    #[error("IO error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File copy failure
    #[error("File copy error from '{from}' to '{to}': {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured directory is missing on one side and so is its parent
    #[error("Neither '{path}' nor its parent directory exists; is the drive mounted?")]
    MissingParent { path: PathBuf },

    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Reading an answer from the user failed
    #[error("Prompt error: {0}")]
    Prompt(#[source] std::io::Error),

    /// The action log could not be written
    #[error("Log error at '{path}': {source}")]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Create a new IO error tied to a path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new copy error
    pub fn copy_error(from: &Path, to: &Path, source: std::io::Error) -> Self {
        Self::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new log error
    pub fn log_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Log {
            path: path.into(),
            source,
        }
    }

    /// The path this error occurred at, if there is a single one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } | Self::MissingParent { path } | Self::Log { path, .. } => {
                Some(path)
            }
            Self::Copy { to, .. } => Some(to),
            _ => None,
        }
    }
}
