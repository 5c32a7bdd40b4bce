//! Confirmation rules and execution of decided operations
//!
//! A [`Mover`] pairs a policy's confirmation rules with an [`Actioner`]. The
//! same mover drives a real run and a dry run: only the actioner differs, so
//! a simulation asks exactly the questions a real run would and logs exactly
//! the lines a real run would.

use std::path::{Path, PathBuf};

use crate::actions::Actioner;
use crate::decision::{Move, Policy};
use crate::entry::{AbsentRef, DirEntry, FileEntry, Origin};
use crate::error::Result;
use crate::metrics::RunStats;
use crate::prompt::Prompter;
use crate::scanner::scan_dir;

/// What became of one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The user said no; nothing was touched
    Declined,
}

/// The question `policy` puts to the user before carrying out `mv`, or
/// `None` when it goes ahead unasked.
///
/// Creating things never asks. Deleting always asks. Overwriting asks when
/// the file being overwritten is local: never under local-to-external,
/// always under external-to-local, and under match only for local targets.
pub fn confirmation_prompt(policy: Policy, mv: &Move) -> Option<String> {
    match mv {
        Move::Copy { .. } | Move::CopyTree { .. } => None,
        Move::Remove(file) => Some(format!("Delete {}", file.path.display())),
        Move::DeleteTree(dir) => Some(format!("Delete all of tree {}", dir.path.display())),
        Move::Replace { to, .. } => {
            let asks = match policy {
                Policy::LocalToExternal => false,
                Policy::ExternalToLocal => true,
                Policy::Match => to.origin == Origin::Local,
            };
            asks.then(|| format!("Replace {}", to.path.display()))
        }
    }
}

/// Carries out operations for one policy
pub struct Mover<'a> {
    policy: Policy,
    actioner: &'a mut dyn Actioner,
    prompter: &'a mut dyn Prompter,
    stats: RunStats,
}

impl<'a> Mover<'a> {
    pub fn new(
        policy: Policy,
        actioner: &'a mut dyn Actioner,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        Self {
            policy,
            actioner,
            prompter,
            stats: RunStats::new(),
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut RunStats {
        &mut self.stats
    }

    pub fn into_stats(self) -> RunStats {
        self.stats
    }

    /// Confirm if the policy requires it, then carry out `mv`.
    pub fn apply(&mut self, mv: Move) -> Result<Outcome> {
        if let Some(question) = confirmation_prompt(self.policy, &mv) {
            if !self.prompter.seek_yes(&question)? {
                tracing::info!(policy = %self.policy, "declined: {}", mv);
                self.stats.record_declined();
                return Ok(Outcome::Declined);
            }
        }

        tracing::debug!(policy = %self.policy, "{}", mv);
        match &mv {
            Move::Replace { from, to } => self.do_replace(from, to)?,
            Move::Copy { from, to } => self.actioner.copy(&from.path, &to.path)?,
            Move::Remove(file) => self.actioner.delete_file(&file.path)?,
            Move::DeleteTree(dir) => self.do_delete_tree(&dir.path, dir.origin)?,
            Move::CopyTree { from, to } => {
                self.do_copy_tree(&from.path, from.origin, &to.path)?
            }
        }
        self.stats.record(mv.kind());
        Ok(Outcome::Applied)
    }

    /// Overwrite an existing file with another.
    pub fn replace(&mut self, from: &FileEntry, to: &FileEntry) -> Result<Outcome> {
        self.apply(Move::Replace {
            from: from.clone(),
            to: to.clone(),
        })
    }

    /// Create a file that does not exist yet.
    pub fn copy(&mut self, from: &FileEntry, to: &AbsentRef) -> Result<Outcome> {
        self.apply(Move::Copy {
            from: from.clone(),
            to: to.clone(),
        })
    }

    /// Delete one file.
    pub fn remove(&mut self, file: &FileEntry) -> Result<Outcome> {
        self.apply(Move::Remove(file.clone()))
    }

    /// Delete a directory and everything in it.
    pub fn delete_tree(&mut self, dir: &DirEntry) -> Result<Outcome> {
        self.apply(Move::DeleteTree(dir.clone()))
    }

    /// Create `to` as a copy of the whole subtree at `from`.
    pub fn copy_tree(&mut self, from: &DirEntry, to: &AbsentRef) -> Result<Outcome> {
        self.apply(Move::CopyTree {
            from: from.clone(),
            to: to.clone(),
        })
    }

    fn do_replace(&mut self, from: &FileEntry, to: &FileEntry) -> Result<()> {
        self.actioner.delete_file(&to.path)?;
        self.actioner.copy(&from.path, &to.path)
    }

    fn do_delete_tree(&mut self, root: &Path, origin: Origin) -> Result<()> {
        let mut pending = vec![root.to_path_buf()];
        let mut emptied = Vec::new();

        while let Some(dir) = pending.pop() {
            let listing = scan_dir(&dir, origin)?;
            for file in listing.files.values() {
                self.actioner.delete_file(&file.path)?;
            }
            // Remove the link or node itself, never what it points at.
            for path in listing.links.values().chain(listing.special.values()) {
                self.actioner.delete_file(path)?;
            }
            pending.extend(listing.dirs.into_values().map(|d| d.path));
            emptied.push(dir);
        }

        // Every directory lands in `emptied` before any of its descendants,
        // so the reversed list removes children before their parents.
        for dir in emptied.iter().rev() {
            self.actioner.delete_dir(dir)?;
        }
        Ok(())
    }

    fn do_copy_tree(&mut self, from: &Path, origin: Origin, to: &Path) -> Result<()> {
        self.actioner.create_dir(to)?;

        let mut pending: Vec<(PathBuf, PathBuf)> =
            vec![(from.to_path_buf(), to.to_path_buf())];
        while let Some((source, destination)) = pending.pop() {
            let listing = scan_dir(&source, origin)?;
            for (name, file) in &listing.files {
                self.actioner.copy(&file.path, &destination.join(name))?;
            }
            for link in listing.links.values() {
                tracing::warn!(link = %link.display(), "not copying symbolic link");
                self.stats.record_skipped_link();
            }
            for path in listing.special.values() {
                tracing::warn!(path = %path.display(), "not copying special file");
                self.stats.record_skipped_special();
            }
            for (name, dir) in listing.dirs {
                let target = destination.join(&name);
                self.actioner.create_dir(&target)?;
                pending.push((dir.path, target));
            }
        }
        Ok(())
    }
}
