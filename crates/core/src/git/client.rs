//! `git` CLI operations on the local clone.

use std::path::Path;

use tracing::{info, instrument};

use super::parser::extract_ref_hash;
use crate::errors::{CommandError, PushError};
use crate::models::CommitHash;
use crate::runner::{quote_path, shell_quote, CommandRunner};

/// Issues `git` commands against the clone in the runner's working directory.
#[derive(Debug)]
pub struct GitClient<'r, R> {
    runner: &'r R,
}

impl<'r, R: CommandRunner> GitClient<'r, R> {
    pub fn new(runner: &'r R) -> Self {
        Self { runner }
    }

    /// Tip hash of a fully qualified ref.
    #[instrument(skip(self))]
    pub async fn tip(&self, reference: &str) -> Result<CommitHash, PushError> {
        let output = self
            .runner
            .run(&format!("git show-ref {}", shell_quote(reference)))
            .await?;
        Ok(extract_ref_hash(&output, reference)?)
    }

    /// Full `git log` of `reference`.
    pub async fn log(&self, reference: &str) -> Result<String, CommandError> {
        self.runner
            .run_logged(&format!("git log {}", shell_quote(reference)))
            .await
    }

    /// Write the tree of `reference` into the existing directory `dest`.
    #[instrument(skip(self), fields(dest = %dest.display()))]
    pub async fn archive(&self, reference: &str, dest: &Path) -> Result<(), CommandError> {
        let cmd = format!(
            "git archive --format=tar {} | tar -x -C {}",
            shell_quote(reference),
            quote_path(dest)
        );
        self.runner.run_logged(&cmd).await?;
        info!("git archive completed");
        Ok(())
    }
}
