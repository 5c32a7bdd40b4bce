//! Timestamp comparison with a tolerance window
//!
//! Filesystems disagree about timestamp resolution: a file copied from NTFS
//! to FAT32 can come out a second or so off. Two modification times are
//! therefore treated as equal when they are at most [`TIME_TOLERANCE`] apart.
//! This is the only rule used to decide which side is newer.

use std::cmp::Ordering;
use std::time::{Duration, SystemTime};

use crate::entry::FileEntry;

/// Largest difference (inclusive) still considered "the same time"
pub const TIME_TOLERANCE: Duration = Duration::from_secs(2);

/// Outcome of comparing the two copies of a file that exists on both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonResult {
    /// Within tolerance
    Identical,
    LocalNewer,
    ExternalNewer,
}

/// Order `one` against `two`, reporting `Equal` inside the tolerance window.
pub fn compare_times(one: SystemTime, two: SystemTime) -> Ordering {
    match one.duration_since(two) {
        Ok(ahead) if ahead <= TIME_TOLERANCE => Ordering::Equal,
        Ok(_) => Ordering::Greater,
        Err(behind) if behind.duration() <= TIME_TOLERANCE => Ordering::Equal,
        Err(_) => Ordering::Less,
    }
}

/// Compare the local and external copies of one file.
pub fn compare_entries(local: &FileEntry, external: &FileEntry) -> ComparisonResult {
    match compare_times(local.modified, external.modified) {
        Ordering::Equal => ComparisonResult::Identical,
        Ordering::Greater => ComparisonResult::LocalNewer,
        Ordering::Less => ComparisonResult::ExternalNewer,
    }
}
