//! The commit message left in the SVN working copy for the operator.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::PushError;
use crate::models::CommitHash;

/// Everything the merge message records about one push.
#[derive(Debug, Clone)]
pub struct MergeLog<'a> {
    pub branch: &'a str,
    pub git_repository: &'a str,
    pub svn_repository: &'a str,
    pub start: &'a CommitHash,
    pub end: &'a CommitHash,
    /// `git log` of the branch, already cut at `start`.
    pub log: &'a str,
}

impl MergeLog<'_> {
    /// The `from repository` line ends with the end hash so that, once
    /// committed, the next push recovers it as its start hash.
    pub fn compose(&self) -> String {
        format!(
            "merge to branch: {}\n\
             from repository: {} {}\n\
             to repository:   {}\n\
             start hash code:  {}\n\
             end   hash code:  {}\n\
             \n\
             {}",
            self.branch,
            self.git_repository,
            self.end,
            self.svn_repository,
            self.start,
            self.end,
            self.log
        )
    }

    /// Overwrite `path` with the composed message.
    pub fn write(&self, path: &Path) -> Result<(), PushError> {
        std::fs::write(path, self.compose().as_bytes()).map_err(|source| PushError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "merge log written");
        Ok(())
    }
}

/// The two commands the operator runs next: enter the working copy, then
/// commit it with the merge log as message.
pub fn commit_instructions(svn_dir: &Path, log_file: &str) -> [String; 2] {
    [
        format!("cd {}", svn_dir.display()),
        format!("svn commit --file {log_file}"),
    ]
}

/// Location of the log file inside the working copy.
pub fn log_path(svn_dir: &Path, log_file: &str) -> PathBuf {
    svn_dir.join(log_file)
}
