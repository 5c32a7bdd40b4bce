//! Single-directory listing
//!
//! Nothing here recurses: the walker and the subtree operations each keep
//! their own explicit work list and call [`scan_dir`] once per directory.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::entry::{DirEntry, FileEntry, Origin};
use crate::error::{Result, SyncError};

/// The immediate children of one directory, keyed by name.
///
/// Keys are unique (the filesystem guarantees it) and iterate in sorted
/// order, so every policy sees siblings in the same order. A name appears in
/// exactly one of the four maps.
#[derive(Debug, Default, Clone)]
pub struct Listing {
    pub files: BTreeMap<OsString, FileEntry>,
    pub dirs: BTreeMap<OsString, DirEntry>,
    /// Symbolic links; never followed
    pub links: BTreeMap<OsString, PathBuf>,
    /// FIFOs, sockets and device nodes; never opened
    pub special: BTreeMap<OsString, PathBuf>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
            && self.dirs.is_empty()
            && self.links.is_empty()
            && self.special.is_empty()
    }

    /// Names that must not be synchronised: links and special files.
    pub fn unsyncable_names(&self) -> impl Iterator<Item = &OsString> {
        self.links.keys().chain(self.special.keys())
    }
}

/// List `path`, tagging every entry with `origin`.
pub fn scan_dir(path: &Path, origin: Origin) -> Result<Listing> {
    let read = fs::read_dir(path).map_err(|e| SyncError::io_error(path, e))?;
    let mut listing = Listing::default();

    for entry in read {
        let entry = entry.map_err(|e| SyncError::io_error(path, e))?;
        let entry_path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| SyncError::io_error(&entry_path, e))?;
        let name = entry.file_name();

        if file_type.is_symlink() {
            listing.links.insert(name, entry_path);
        } else if file_type.is_dir() {
            listing
                .dirs
                .insert(name.clone(), DirEntry::new(name, entry_path, origin));
        } else if file_type.is_file() {
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .map_err(|e| SyncError::io_error(&entry_path, e))?;
            listing
                .files
                .insert(name.clone(), FileEntry::new(name, entry_path, modified, origin));
        } else {
            listing.special.insert(name, entry_path);
        }
    }

    Ok(listing)
}

/// Like [`scan_dir`], but a directory that does not exist lists as empty as
/// long as its parent exists. A missing parent is an error: it usually means
/// a whole root (such as an unplugged drive) is gone.
pub fn scan_side(path: &Path, origin: Origin) -> Result<Listing> {
    match fs::metadata(path) {
        Ok(_) => scan_dir(path, origin),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if parent_exists(path) {
                tracing::debug!(
                    path = %path.display(),
                    %origin,
                    "directory absent, treating as empty"
                );
                Ok(Listing::default())
            } else {
                Err(SyncError::MissingParent {
                    path: path.to_path_buf(),
                })
            }
        }
        Err(e) => Err(SyncError::io_error(path, e)),
    }
}

/// Whether the directory that would contain `path` exists.
pub fn parent_exists(path: &Path) -> bool {
    path.parent().map_or(false, |parent| parent.is_dir())
}
