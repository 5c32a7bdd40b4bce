//! One complete run: a policy and a mode applied to every configured directory

use std::path::PathBuf;

use crate::config::SyncConfig;
use crate::error::Result;
use crate::log::{timestamp, ActionLog};
use crate::menu::Choice;
use crate::metrics::RunStats;
use crate::mover::Mover;
use crate::prompt::Prompter;
use crate::walker::TreeWalker;

/// A configured run, ready to start
#[derive(Debug, Clone)]
pub struct Session {
    walker: TreeWalker,
    directories: Vec<PathBuf>,
    choice: Choice,
}

impl Session {
    pub fn new(config: &SyncConfig, choice: Choice) -> Self {
        Self {
            walker: TreeWalker::new(&config.local_root, &config.external_root),
            directories: config.directories.clone(),
            choice,
        }
    }

    pub fn choice(&self) -> Choice {
        self.choice
    }

    /// Process every configured directory in order.
    ///
    /// Stops at the first error; whatever was done before it stays done.
    pub fn run(&self, prompter: &mut dyn Prompter, log: &mut dyn ActionLog) -> Result<RunStats> {
        let Choice { policy, mode } = self.choice;
        tracing::info!(%policy, %mode, directories = self.directories.len(), "starting run");

        let mut actioner = mode.actioner(log);
        let mut mover = Mover::new(policy, actioner.as_mut(), prompter);
        for dir in &self.directories {
            tracing::info!(dir = %dir.display(), "synchronising");
            self.walker.process_from_root(dir, &mut mover)?;
        }

        let stats = mover.into_stats();
        tracing::info!("run complete: {}", stats.summary());
        Ok(stats)
    }

    /// [`Session::run`] framed by a start line and a completion line.
    ///
    /// The completion line is written whether or not the run succeeded; the
    /// run's own result is returned either way.
    pub fn run_logged(
        &self,
        prompter: &mut dyn Prompter,
        log: &mut dyn ActionLog,
    ) -> Result<RunStats> {
        log.write_line(&format!("Ran at {}", timestamp()))?;

        let result = self.run(prompter, log);
        let completion = match &result {
            Ok(_) => format!("Finished successfully at {}", timestamp()),
            Err(e) => format!("Finished with error at {}: {}", timestamp(), e),
        };
        if let Err(e) = log.write_line(&completion) {
            tracing::warn!("Failed to write completion line: {}", e);
        }
        result
    }
}
