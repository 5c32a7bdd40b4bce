//! Run configuration: the two roots and the directories to keep in step

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// What to synchronise, loaded from TOML:
///
/// ```toml
/// local_root = "/home/me/Documents"
/// external_root = "/media/usb"
/// directories = ["photos", "work/notes"]
/// log_file = "synclog.txt"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub local_root: PathBuf,
    pub external_root: PathBuf,
    /// Directories relative to both roots, processed in order
    pub directories: Vec<PathBuf>,
    /// Where execute runs record what they did
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl SyncConfig {
    pub fn new(
        local_root: impl Into<PathBuf>,
        external_root: impl Into<PathBuf>,
        directories: Vec<PathBuf>,
    ) -> Self {
        Self {
            local_root: local_root.into(),
            external_root: external_root.into(),
            directories,
            log_file: default_log_file(),
        }
    }

    /// Read, parse and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SyncError::io_error(path, e))?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.directories.is_empty() {
            return Err(SyncError::config_error("no directories to sync"));
        }
        if self.local_root == self.external_root {
            return Err(SyncError::config_error(format!(
                "local and external roots are the same: {}",
                self.local_root.display()
            )));
        }
        for dir in &self.directories {
            let escapes = dir.components().any(|c| {
                matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
            });
            if escapes {
                return Err(SyncError::config_error(format!(
                    "directory '{}' must be relative and stay below both roots",
                    dir.display()
                )));
            }
        }

        // Each directory is walked on its own, so one must not contain another.
        let normalized: Vec<PathBuf> = self
            .directories
            .iter()
            .map(|dir| dir.components().filter(|c| *c != Component::CurDir).collect())
            .collect();
        for (i, first) in normalized.iter().enumerate() {
            for (j, second) in normalized.iter().enumerate().skip(i + 1) {
                if first.starts_with(second) || second.starts_with(first) {
                    return Err(SyncError::config_error(format!(
                        "directories '{}' and '{}' overlap",
                        self.directories[i].display(),
                        self.directories[j].display()
                    )));
                }
            }
        }
        Ok(())
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from("synclog.txt")
}
