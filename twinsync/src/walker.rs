//! Walks matching directories under both roots and dispatches every name

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::decision::{Case, Move, Policy};
use crate::entry::{AbsentRef, DirEntry, Origin, Presence};
use crate::error::{Result, SyncError};
use crate::mover::Mover;
use crate::scanner::{parent_exists, scan_side, Listing};

/// Decisions for the immediate children of one directory pair
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DirPlan {
    /// Operations, in dispatch order
    pub moves: Vec<Move>,
    /// Names of subdirectories present on both sides
    pub descend: Vec<OsString>,
}

/// Classify every name in a pair of listings and ask `policy` about each.
///
/// Only listings are consulted, never the filesystem, so the result depends
/// on which names exist and not on the order they were enumerated in. A name
/// held by a link or special file on either side is left out on both sides.
pub fn plan_directory(
    policy: Policy,
    local_dir: &Path,
    external_dir: &Path,
    local: Listing,
    external: Listing,
) -> DirPlan {
    let unsyncable: BTreeSet<OsString> = local
        .unsyncable_names()
        .chain(external.unsyncable_names())
        .cloned()
        .collect();
    let mut local = local;
    let mut external = external;
    for listing in [&mut local, &mut external] {
        listing.files.retain(|name, _| !unsyncable.contains(name));
        listing.dirs.retain(|name, _| !unsyncable.contains(name));
    }

    let mut plan = DirPlan::default();
    let mut external_files = external.files;

    for (name, local_file) in local.files {
        let external_side = match external_files.remove(&name) {
            Some(external_file) => Presence::Present(external_file),
            None => Presence::Absent(AbsentRef::within(external_dir, &name, Origin::External)),
        };
        plan.push(policy, Case::for_file(Presence::Present(local_file), external_side));
    }
    for (name, external_file) in external_files {
        let local_side = Presence::Absent(AbsentRef::within(local_dir, &name, Origin::Local));
        plan.push(policy, Case::for_file(local_side, Presence::Present(external_file)));
    }

    let mut external_dirs = external.dirs;
    for (name, local_sub) in local.dirs {
        if external_dirs.remove(&name).is_some() {
            plan.descend.push(name);
        } else {
            let external_side =
                Presence::Absent(AbsentRef::within(external_dir, &name, Origin::External));
            plan.push(policy, Case::for_dir(Presence::Present(local_sub), external_side));
        }
    }
    for (name, external_sub) in external_dirs {
        let local_side = Presence::Absent(AbsentRef::within(local_dir, &name, Origin::Local));
        plan.push(policy, Case::for_dir(local_side, Presence::Present(external_sub)));
    }

    plan
}

impl DirPlan {
    fn push(&mut self, policy: Policy, case: Option<Case>) {
        if let Some(mv) = case.and_then(|case| policy.decide(case)) {
            self.moves.push(mv);
        }
    }
}

/// Walks the configured directories of a local and an external root
#[derive(Debug, Clone)]
pub struct TreeWalker {
    local_root: PathBuf,
    external_root: PathBuf,
}

impl TreeWalker {
    pub fn new(local_root: impl Into<PathBuf>, external_root: impl Into<PathBuf>) -> Self {
        Self {
            local_root: local_root.into(),
            external_root: external_root.into(),
        }
    }

    pub fn local_root(&self) -> &Path {
        &self.local_root
    }

    pub fn external_root(&self) -> &Path {
        &self.external_root
    }

    /// Synchronise `relative_root` and everything beneath it.
    ///
    /// Subdirectories present on both sides are queued on an explicit work
    /// list; the walk never recurses, so stack depth does not grow with tree
    /// depth. A subdirectory present on one side only is handed to the
    /// policy as a single subtree operation and not entered.
    pub fn process_from_root(&self, relative_root: &Path, mover: &mut Mover<'_>) -> Result<()> {
        if !self.dispatch_root(relative_root, mover)? {
            return Ok(());
        }

        let policy = mover.policy();
        let mut pending = vec![relative_root.to_path_buf()];
        while let Some(relative) = pending.pop() {
            let local_dir = self.local_root.join(&relative);
            let external_dir = self.external_root.join(&relative);
            tracing::debug!(dir = %relative.display(), "processing");

            let local = scan_side(&local_dir, Origin::Local)?;
            let external = scan_side(&external_dir, Origin::External)?;
            for link in local.links.values().chain(external.links.values()) {
                tracing::warn!(link = %link.display(), "skipping symbolic link");
                mover.stats_mut().record_skipped_link();
            }
            for path in local.special.values().chain(external.special.values()) {
                tracing::warn!(path = %path.display(), "skipping special file");
                mover.stats_mut().record_skipped_special();
            }

            let plan = plan_directory(policy, &local_dir, &external_dir, local, external);
            for mv in plan.moves {
                mover.apply(mv)?;
            }
            pending.extend(plan.descend.into_iter().map(|name| relative.join(name)));
        }
        Ok(())
    }

    /// Handle the configured directory itself. Returns whether it exists on
    /// both sides and should be walked.
    fn dispatch_root(&self, relative_root: &Path, mover: &mut Mover<'_>) -> Result<bool> {
        let local_dir = self.local_root.join(relative_root);
        let external_dir = self.external_root.join(relative_root);
        let name: OsString = relative_root
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| relative_root.as_os_str().to_owned());

        let case = match (local_dir.is_dir(), external_dir.is_dir()) {
            (true, true) => return Ok(true),
            (false, false) => {
                tracing::warn!(
                    dir = %relative_root.display(),
                    "directory exists on neither side, nothing to do"
                );
                return Ok(false);
            }
            (true, false) => {
                ensure_parent(&external_dir)?;
                Case::DirLocalOnly {
                    local: DirEntry::new(name, local_dir, Origin::Local),
                    external: AbsentRef::new(external_dir, Origin::External),
                }
            }
            (false, true) => {
                ensure_parent(&local_dir)?;
                Case::DirExternalOnly {
                    local: AbsentRef::new(local_dir, Origin::Local),
                    external: DirEntry::new(name, external_dir, Origin::External),
                }
            }
        };

        if let Some(mv) = mover.policy().decide(case) {
            mover.apply(mv)?;
        }
        Ok(false)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if parent_exists(path) {
        Ok(())
    } else {
        Err(SyncError::MissingParent {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::MoveKind;
    use crate::entry::FileEntry;
    use std::time::{Duration, SystemTime};

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000 + secs)
    }

    fn listing(dir: &str, origin: Origin, files: &[(&str, u64)], dirs: &[&str]) -> Listing {
        let mut listing = Listing::default();
        for (name, secs) in files {
            let entry = FileEntry::new(*name, Path::new(dir).join(name), at(*secs), origin);
            listing.files.insert(OsString::from(name), entry);
        }
        for name in dirs {
            let entry = DirEntry::new(*name, Path::new(dir).join(name), origin);
            listing.dirs.insert(OsString::from(name), entry);
        }
        listing
    }

    #[test]
    fn test_plan_classifies_every_name() {
        let local = listing(
            "/l",
            Origin::Local,
            &[("same", 0), ("newer", 100), ("mine", 0)],
            &["both", "lonly"],
        );
        let external = listing(
            "/e",
            Origin::External,
            &[("same", 1), ("newer", 0), ("theirs", 0)],
            &["both", "eonly"],
        );

        let plan = plan_directory(Policy::Match, Path::new("/l"), Path::new("/e"), local, external);

        let kinds: Vec<MoveKind> = plan.moves.iter().map(Move::kind).collect();
        assert_eq!(
            kinds,
            vec![
                MoveKind::Copy,
                MoveKind::Replace,
                MoveKind::Copy,
                MoveKind::CopyTree,
                MoveKind::CopyTree,
            ]
        );
        assert_eq!(plan.descend, vec![OsString::from("both")]);
        match &plan.moves[2] {
            Move::Copy { from, to } => {
                assert_eq!(from.path, PathBuf::from("/e/theirs"));
                assert_eq!(to.path, PathBuf::from("/l/theirs"));
                assert_eq!(to.origin, Origin::Local);
            }
            other => panic!("unexpected move {other:?}"),
        }
    }

    #[test]
    fn test_plan_ignores_enumeration_order() {
        let local_in = |order: [&str; 3]| {
            let mut l = Listing::default();
            for name in order {
                let entry = FileEntry::new(name, Path::new("/l").join(name), at(50), Origin::Local);
                l.files.insert(name.into(), entry);
            }
            l
        };
        let external = || listing("/e", Origin::External, &[("b", 0), ("z", 0)], &[]);
        let (l, e) = (Path::new("/l"), Path::new("/e"));

        for policy in [Policy::Match, Policy::LocalToExternal, Policy::ExternalToLocal] {
            let one = plan_directory(policy, l, e, local_in(["a", "b", "c"]), external());
            let two = plan_directory(policy, l, e, local_in(["c", "b", "a"]), external());
            assert_eq!(one, two);
        }
    }

    #[test]
    fn test_plan_in_sync_is_empty() {
        let local = listing("/l", Origin::Local, &[("a", 10), ("b", 20)], &["d"]);
        let external = listing("/e", Origin::External, &[("a", 11), ("b", 18)], &["d"]);
        for policy in [Policy::Match, Policy::LocalToExternal, Policy::ExternalToLocal] {
            let plan = plan_directory(
                policy,
                Path::new("/l"),
                Path::new("/e"),
                local.clone(),
                external.clone(),
            );
            assert!(plan.moves.is_empty());
            assert_eq!(plan.descend, vec![OsString::from("d")]);
        }
    }

    #[test]
    fn test_plan_leaves_out_names_held_by_links() {
        let mut local = listing("/l", Origin::Local, &[("plain", 0), ("pipe", 0)], &[]);
        local.links.insert("a.txt".into(), PathBuf::from("/l/a.txt"));
        local.links.insert("shared".into(), PathBuf::from("/l/shared"));
        let mut external = listing("/e", Origin::External, &[("a.txt", 0)], &["shared"]);
        external.special.insert("pipe".into(), PathBuf::from("/e/pipe"));

        for policy in [Policy::Match, Policy::LocalToExternal, Policy::ExternalToLocal] {
            let plan = plan_directory(
                policy,
                Path::new("/l"),
                Path::new("/e"),
                local.clone(),
                external.clone(),
            );
            let touched: Vec<PathBuf> = plan
                .moves
                .iter()
                .flat_map(|mv| match mv {
                    Move::Copy { from, to } => vec![from.path.clone(), to.path.clone()],
                    Move::Replace { from, to } => vec![from.path.clone(), to.path.clone()],
                    Move::Remove(file) => vec![file.path.clone()],
                    Move::CopyTree { from, to } => vec![from.path.clone(), to.path.clone()],
                    Move::DeleteTree(dir) => vec![dir.path.clone()],
                })
                .collect();
            assert!(touched.iter().all(|p| p.ends_with("plain")), "{policy}: {touched:?}");
            assert!(plan.descend.is_empty());
        }
    }
}
