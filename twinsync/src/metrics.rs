//! Counters for one run

use crate::decision::MoveKind;

/// What a run did, counted per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Existing files overwritten
    pub replaced: usize,
    /// New files created
    pub copied: usize,
    /// Single files deleted
    pub removed: usize,
    /// Whole subtrees deleted
    pub trees_deleted: usize,
    /// Whole subtrees created
    pub trees_copied: usize,
    /// Operations the user declined to confirm
    pub declined: usize,
    /// Symbolic links left untouched
    pub skipped_links: usize,
    /// FIFOs, sockets and device nodes left untouched
    pub skipped_special: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one applied operation.
    pub fn record(&mut self, kind: MoveKind) {
        match kind {
            MoveKind::Replace => self.replaced += 1,
            MoveKind::Copy => self.copied += 1,
            MoveKind::Remove => self.removed += 1,
            MoveKind::DeleteTree => self.trees_deleted += 1,
            MoveKind::CopyTree => self.trees_copied += 1,
        }
    }

    pub fn record_declined(&mut self) {
        self.declined += 1;
    }

    pub fn record_skipped_link(&mut self) {
        self.skipped_links += 1;
    }

    pub fn record_skipped_special(&mut self) {
        self.skipped_special += 1;
    }

    /// Operations actually applied (declined ones excluded)
    pub fn total_operations(&self) -> usize {
        self.replaced + self.copied + self.removed + self.trees_deleted + self.trees_copied
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        format!(
            "{} operations ({} replaced, {} copied, {} removed, {} trees copied, \
             {} trees deleted), {} declined, {} links skipped, {} special files skipped",
            self.total_operations(),
            self.replaced,
            self.copied,
            self.removed,
            self.trees_copied,
            self.trees_deleted,
            self.declined,
            self.skipped_links,
            self.skipped_special,
        )
    }
}
