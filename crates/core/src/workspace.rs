//! Work directory layout and preparation of the two trees.
//!
//! ```text
//! <root>/<directory>/svn   SVN working copy of the target branch
//! <root>/<directory>/git   clean snapshot of the Git branch
//! ```
//!
//! Paths handed to commands stay relative to the project root, exactly as
//! configured; filesystem access goes through [`Workspace::on_disk`].

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::branch::BranchSpec;
use crate::config::{ExportMethod, PushConfig};
use crate::errors::PushError;
use crate::git::GitClient;
use crate::prompt::Confirm;
use crate::runner::CommandRunner;
use crate::svn::SvnClient;

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    directory: PathBuf,
    svn_dir: PathBuf,
    git_dir: PathBuf,
}

impl Workspace {
    /// `directory` is relative to `root` unless absolute.
    pub fn new(root: impl Into<PathBuf>, directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        Self {
            root: root.into(),
            svn_dir: directory.join("svn"),
            git_dir: directory.join("git"),
            directory,
        }
    }

    pub fn svn_dir(&self) -> &Path {
        &self.svn_dir
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// `rel` inside the SVN working copy.
    pub fn svn_file(&self, rel: &str) -> PathBuf {
        self.svn_dir.join(rel)
    }

    /// `rel` inside the Git export.
    pub fn git_file(&self, rel: &str) -> PathBuf {
        self.git_dir.join(rel)
    }

    /// Where a workspace path lives on disk.
    pub fn on_disk(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Create the work directory if needed.
    pub fn ensure_directory(&self) -> Result<(), PushError> {
        let dir = self.on_disk(&self.directory);
        std::fs::create_dir_all(&dir).map_err(|source| PushError::Io { path: dir, source })
    }

    /// Check out `branch`, or reuse an existing working copy after
    /// confirmation.
    ///
    /// A reused working copy is reverted and stripped of unversioned entries
    /// so leftovers from an interrupted run do not leak into the result.
    #[instrument(skip_all, fields(svn_dir = %self.svn_dir.display()))]
    pub async fn prepare_svn<R: CommandRunner, C: Confirm + ?Sized>(
        &self,
        svn: &SvnClient<'_, R>,
        confirm: &mut C,
        repository: &str,
        branch: &BranchSpec,
    ) -> Result<(), PushError> {
        if self.on_disk(&self.svn_dir).is_dir() {
            let question = format!("Use existing svn directory: {}", self.svn_dir.display());
            if !ask(confirm, &question)? {
                return Err(PushError::UserAbort);
            }
            svn.revert(&self.svn_dir).await?;
            for stray in svn.unversioned(&self.svn_dir).await? {
                self.remove_unversioned(Path::new(&stray))?;
            }
            info!("reusing svn working copy");
        } else {
            let url = format!("{}/{}", repository, branch.svn_path);
            svn.checkout(&url, &self.svn_dir).await?;
        }
        Ok(())
    }

    /// Export the Git branch, or reuse an existing snapshot after
    /// confirmation.
    #[instrument(skip_all, fields(git_dir = %self.git_dir.display()))]
    pub async fn prepare_git<R: CommandRunner, C: Confirm + ?Sized>(
        &self,
        runner: &R,
        confirm: &mut C,
        config: &PushConfig,
        branch: &BranchSpec,
    ) -> Result<(), PushError> {
        if self.on_disk(&self.git_dir).is_dir() {
            let question = format!("Use existing git directory: {}", self.git_dir.display());
            if !ask(confirm, &question)? {
                return Err(PushError::UserAbort);
            }
            info!("reusing git snapshot");
            return Ok(());
        }

        match config.git.export {
            ExportMethod::Archive => {
                let dir = self.on_disk(&self.git_dir);
                std::fs::create_dir_all(&dir)
                    .map_err(|source| PushError::Io { path: dir, source })?;
                GitClient::new(runner)
                    .archive(&branch.git_ref, &self.git_dir)
                    .await?;
            }
            ExportMethod::SvnBridge => {
                let url = format!("{}/{}", config.git.repository, branch.git_path);
                SvnClient::new(runner).export(&url, &self.git_dir).await?;
            }
        }
        Ok(())
    }

    fn remove_unversioned(&self, stray: &Path) -> Result<(), PushError> {
        let path = self.on_disk(stray);
        debug!(path = %path.display(), "removing unversioned entry");
        let result = if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        result.map_err(|source| PushError::Io { path, source })
    }
}

fn ask<C: Confirm + ?Sized>(confirm: &mut C, question: &str) -> Result<bool, PushError> {
    confirm.confirm(question).map_err(PushError::Prompt)
}
