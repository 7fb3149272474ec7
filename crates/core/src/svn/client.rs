//! `svn` CLI operations on the working copy.

use std::path::Path;

use tracing::{debug, info, instrument};

use super::parser::{extract_revision, parse_unversioned};
use crate::errors::{CommandError, PushError};
use crate::models::Revision;
use crate::runner::{quote_path, shell_quote, CommandRunner};

/// Issues `svn` commands through a [`CommandRunner`].
///
/// Mutating commands are echoed to the console; queries run silently.
#[derive(Debug)]
pub struct SvnClient<'r, R> {
    runner: &'r R,
}

impl<'r, R: CommandRunner> SvnClient<'r, R> {
    pub fn new(runner: &'r R) -> Self {
        Self { runner }
    }

    #[instrument(skip(self), fields(dest = %dest.display()))]
    pub async fn checkout(&self, url: &str, dest: &Path) -> Result<(), CommandError> {
        let cmd = format!("svn checkout {} {}", shell_quote(url), quote_path(dest));
        self.runner.run_logged(&cmd).await?;
        info!("svn checkout completed");
        Ok(())
    }

    /// Export `url` into `dest` (used against a Git host's SVN bridge).
    #[instrument(skip(self), fields(dest = %dest.display()))]
    pub async fn export(&self, url: &str, dest: &Path) -> Result<(), CommandError> {
        let cmd = format!("svn export {} {}", shell_quote(url), quote_path(dest));
        self.runner.run_logged(&cmd).await?;
        info!("svn export completed");
        Ok(())
    }

    #[instrument(skip(self), fields(wc = %wc.display()))]
    pub async fn revert(&self, wc: &Path) -> Result<(), CommandError> {
        let cmd = format!("svn revert --recursive {}", quote_path(wc));
        self.runner.run_logged(&cmd).await?;
        Ok(())
    }

    /// Paths `svn status` reports as unversioned, as printed by svn.
    #[instrument(skip(self), fields(wc = %wc.display()))]
    pub async fn unversioned(&self, wc: &Path) -> Result<Vec<String>, CommandError> {
        let cmd = format!("svn status {}", quote_path(wc));
        let output = self.runner.run(&cmd).await?;
        let paths = parse_unversioned(&output);
        debug!(count = paths.len(), "unversioned entries");
        Ok(paths)
    }

    /// Raw `svn info` output for `wc`.
    pub async fn info(&self, wc: &Path) -> Result<String, CommandError> {
        self.runner.run(&format!("svn info {}", quote_path(wc))).await
    }

    /// Raw `svn log` output for a single revision of `wc`.
    pub async fn log(&self, rev: Revision, wc: &Path) -> Result<String, CommandError> {
        self.runner
            .run(&format!("svn log -r {} {}", rev, quote_path(wc)))
            .await
    }

    /// `svn copy`, keeping the history of `from`.
    pub async fn copy(&self, from: &Path, to: &Path) -> Result<(), CommandError> {
        let cmd = format!(
            "svn copy --parents {} {}",
            quote_path(from),
            quote_path(to)
        );
        self.runner.run_logged(&cmd).await?;
        Ok(())
    }

    pub async fn add(&self, path: &Path) -> Result<(), CommandError> {
        let cmd = format!("svn add --parents {}", quote_path(path));
        self.runner.run_logged(&cmd).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &Path) -> Result<(), CommandError> {
        let cmd = format!("svn delete --force {}", quote_path(path));
        self.runner.run_logged(&cmd).await?;
        Ok(())
    }

    /// `Last Changed Rev` of the working copy.
    pub async fn last_changed_rev(&self, wc: &Path) -> Result<Revision, PushError> {
        let info = self.info(wc).await?;
        Ok(extract_revision(&info)?)
    }
}
