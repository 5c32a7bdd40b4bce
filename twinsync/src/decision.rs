//! Which operation, if any, a comparison case calls for under each policy

use std::fmt;

use crate::comparator::{compare_entries, ComparisonResult};
use crate::entry::{AbsentRef, DirEntry, FileEntry, Presence};

/// The five ways a name can compare across the two sides.
///
/// A directory present on both sides is not a case: the walker descends
/// into it instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Case {
    FileBoth { local: FileEntry, external: FileEntry },
    FileLocalOnly { local: FileEntry, external: AbsentRef },
    FileExternalOnly { local: AbsentRef, external: FileEntry },
    DirLocalOnly { local: DirEntry, external: AbsentRef },
    DirExternalOnly { local: AbsentRef, external: DirEntry },
}

impl Case {
    /// Classify a file name from what each side holds. `None` when neither
    /// side has it.
    pub fn for_file(local: Presence<FileEntry>, external: Presence<FileEntry>) -> Option<Self> {
        match (local, external) {
            (Presence::Present(local), Presence::Present(external)) => {
                Some(Case::FileBoth { local, external })
            }
            (Presence::Present(local), Presence::Absent(external)) => {
                Some(Case::FileLocalOnly { local, external })
            }
            (Presence::Absent(local), Presence::Present(external)) => {
                Some(Case::FileExternalOnly { local, external })
            }
            (Presence::Absent(_), Presence::Absent(_)) => None,
        }
    }

    /// Classify a directory name. `None` when both or neither side has it.
    pub fn for_dir(local: Presence<DirEntry>, external: Presence<DirEntry>) -> Option<Self> {
        match (local, external) {
            (Presence::Present(local), Presence::Absent(external)) => {
                Some(Case::DirLocalOnly { local, external })
            }
            (Presence::Absent(local), Presence::Present(external)) => {
                Some(Case::DirExternalOnly { local, external })
            }
            _ => None,
        }
    }
}

/// An operation chosen by a policy, not yet confirmed or carried out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    /// Overwrite an existing file
    Replace { from: FileEntry, to: FileEntry },
    /// Create a file that does not exist yet
    Copy { from: FileEntry, to: AbsentRef },
    /// Delete a single file
    Remove(FileEntry),
    /// Delete a directory and everything below it
    DeleteTree(DirEntry),
    /// Create a directory as a copy of a whole subtree
    CopyTree { from: DirEntry, to: AbsentRef },
}

impl Move {
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Replace { .. } => MoveKind::Replace,
            Move::Copy { .. } => MoveKind::Copy,
            Move::Remove(_) => MoveKind::Remove,
            Move::DeleteTree(_) => MoveKind::DeleteTree,
            Move::CopyTree { .. } => MoveKind::CopyTree,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Replace { from, to } => {
                write!(f, "replace '{}' -> '{}'", from.path.display(), to.path.display())
            }
            Move::Copy { from, to } => {
                write!(f, "copy '{}' -> '{}'", from.path.display(), to.path.display())
            }
            Move::Remove(file) => write!(f, "remove '{}'", file.path.display()),
            Move::DeleteTree(dir) => write!(f, "delete tree '{}'", dir.path.display()),
            Move::CopyTree { from, to } => {
                write!(f, "copy tree '{}' -> '{}'", from.path.display(), to.path.display())
            }
        }
    }
}

/// Discriminant of [`Move`], for counting and matching without payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Replace,
    Copy,
    Remove,
    DeleteTree,
    CopyTree,
}

/// Exchange policy between the two roots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Keep the newer copy of every file, in both directions
    Match,
    /// Make external look like local
    LocalToExternal,
    /// Make local look like external
    ExternalToLocal,
}

impl Policy {
    /// Map one comparison case to at most one operation.
    pub fn decide(self, case: Case) -> Option<Move> {
        match self {
            Policy::LocalToExternal => local_to_external(case),
            Policy::ExternalToLocal => external_to_local(case),
            Policy::Match => match_newest(case),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Match => write!(f, "match"),
            Policy::LocalToExternal => write!(f, "local to external"),
            Policy::ExternalToLocal => write!(f, "external to local"),
        }
    }
}

// Local is the single source of truth: any time difference, in either
// direction, overwrites external.
fn local_to_external(case: Case) -> Option<Move> {
    match case {
        Case::FileBoth { local, external } => match compare_entries(&local, &external) {
            ComparisonResult::Identical => None,
            _ => Some(Move::Replace { from: local, to: external }),
        },
        Case::FileLocalOnly { local, external } => Some(Move::Copy { from: local, to: external }),
        Case::FileExternalOnly { external, .. } => Some(Move::Remove(external)),
        Case::DirLocalOnly { local, external } => Some(Move::CopyTree {
            from: local,
            to: external,
        }),
        Case::DirExternalOnly { external, .. } => Some(Move::DeleteTree(external)),
    }
}

// Mirror image of local_to_external.
fn external_to_local(case: Case) -> Option<Move> {
    match case {
        Case::FileBoth { local, external } => match compare_entries(&local, &external) {
            ComparisonResult::Identical => None,
            _ => Some(Move::Replace { from: external, to: local }),
        },
        Case::FileLocalOnly { local, .. } => Some(Move::Remove(local)),
        Case::FileExternalOnly { local, external } => Some(Move::Copy {
            from: external,
            to: local,
        }),
        Case::DirLocalOnly { local, .. } => Some(Move::DeleteTree(local)),
        Case::DirExternalOnly { local, external } => Some(Move::CopyTree {
            from: external,
            to: local,
        }),
    }
}

// The only policy that looks at which side is newer. Nothing is ever deleted.
fn match_newest(case: Case) -> Option<Move> {
    match case {
        Case::FileBoth { local, external } => match compare_entries(&local, &external) {
            ComparisonResult::Identical => None,
            ComparisonResult::LocalNewer => Some(Move::Replace { from: local, to: external }),
            ComparisonResult::ExternalNewer => Some(Move::Replace { from: external, to: local }),
        },
        Case::FileLocalOnly { local, external } => Some(Move::Copy { from: local, to: external }),
        Case::FileExternalOnly { local, external } => Some(Move::Copy {
            from: external,
            to: local,
        }),
        Case::DirLocalOnly { local, external } => Some(Move::CopyTree {
            from: local,
            to: external,
        }),
        Case::DirExternalOnly { local, external } => Some(Move::CopyTree {
            from: external,
            to: local,
        }),
    }
}
