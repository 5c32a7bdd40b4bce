//! Twinsync Library
//!
//! Keeps a set of directories in step between a local root and an external
//! (removable) root, providing:
//! - Tolerant modification-time comparison
//! - Three decision policies: match newest, local to external, external to local
//! - Confirmation before anything local is overwritten or deleted
//! - Dry runs that ask and log exactly what a real run would
//! - Whole-subtree copy and delete

pub mod actions;
pub mod comparator;
pub mod config;
pub mod decision;
pub mod entry;
pub mod error;
pub mod log;
pub mod menu;
pub mod metrics;
pub mod mover;
pub mod prompt;
pub mod scanner;
pub mod session;
pub mod walker;

// Re-export main types and functions
pub use actions::{Actioner, Mode, PerformActions, SimulateActions};
pub use comparator::{compare_entries, compare_times, ComparisonResult, TIME_TOLERANCE};
pub use config::SyncConfig;
pub use decision::{Case, Move, MoveKind, Policy};
pub use entry::{AbsentRef, DirEntry, FileEntry, Origin, Presence};
pub use error::{Result, SyncError};
pub use log::{ActionLog, ConsoleLog, FileLog, MemoryLog};
pub use menu::{menu_text, Choice};
pub use metrics::RunStats;
pub use mover::{Mover, Outcome};
pub use prompt::{ConsolePrompter, Prompter, ScriptedPrompter};
pub use session::Session;
pub use walker::TreeWalker;

/// Run `choice` over every directory in `config`.
pub fn sync_directories(
    config: &SyncConfig,
    choice: Choice,
    prompter: &mut dyn Prompter,
    log: &mut dyn ActionLog,
) -> Result<RunStats> {
    Session::new(config, choice).run(prompter, log)
}

#[cfg(test)]
mod session_tests;
