//! Transient descriptions of what exists (or would exist) on either side

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Which root a name belongs to. Policies use it to decide how much to ask
/// the user before touching a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Local,
    External,
}

impl Origin {
    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Origin::Local => Origin::External,
            Origin::External => Origin::Local,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Local => write!(f, "local"),
            Origin::External => write!(f, "external"),
        }
    }
}

/// A file that exists, as seen while listing its parent directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: OsString,
    pub path: PathBuf,
    pub modified: SystemTime,
    pub origin: Origin,
}

impl FileEntry {
    pub fn new(
        name: impl Into<OsString>,
        path: impl Into<PathBuf>,
        modified: SystemTime,
        origin: Origin,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            modified,
            origin,
        }
    }
}

/// A directory that exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: OsString,
    pub path: PathBuf,
    pub origin: Origin,
}

impl DirEntry {
    pub fn new(name: impl Into<OsString>, path: impl Into<PathBuf>, origin: Origin) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            origin,
        }
    }
}

/// Where a file or directory would live on a side that lacks it.
/// There is no timestamp: nothing exists to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsentRef {
    pub path: PathBuf,
    pub origin: Origin,
}

impl AbsentRef {
    pub fn new(path: impl Into<PathBuf>, origin: Origin) -> Self {
        Self {
            path: path.into(),
            origin,
        }
    }

    /// The absent counterpart of `name` inside `dir` on side `origin`.
    pub fn within(dir: &Path, name: &OsStr, origin: Origin) -> Self {
        Self::new(dir.join(name), origin)
    }
}

/// One side's half of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence<T> {
    Present(T),
    Absent(AbsentRef),
}

impl<T> Presence<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present(_))
    }
}
