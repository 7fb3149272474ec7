//! Mirroring the Git export into the SVN working copy.
//!
//! [`Reconciler::plan`] decides what to do from the two trees alone;
//! [`Reconciler::apply`] carries a plan out through `svn` and the filesystem.
//!
//! A created file whose content (stamp lines aside) equals a deleted file's
//! is recorded as `svn copy` from that file, so renames keep their history.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::errors::ReconcileError;
use crate::runner::CommandRunner;
use crate::stamp::StampFilter;
use crate::svn::SvnClient;
use crate::tree::TreeDiff;
use crate::workspace::Workspace;

/// One change to the SVN working copy. Paths are tree-relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `svn copy` a deleted file to a created one with the same content.
    Copy { from: String, to: String },
    /// Copy a new file in and `svn add` it.
    Add { path: String },
    /// `svn delete --force` a file that is gone from Git, or a directory
    /// that Git replaced with a file.
    Delete { path: String },
    /// Overwrite a file whose content changed.
    Update { path: String },
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Copy { .. } => "copy",
            Self::Add { .. } => "add",
            Self::Delete { .. } => "delete",
            Self::Update { .. } => "update",
        }
    }

    /// The path the action leaves in (or removes from) the working copy.
    pub fn path(&self) -> &str {
        match self {
            Self::Copy { to, .. } => to,
            Self::Add { path } | Self::Delete { path } | Self::Update { path } => path,
        }
    }
}

/// Ordered actions: deletes that make room for a created path, copies and
/// adds, the remaining deletes, then updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub actions: Vec<Action>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of actions with the given [`Action::label`].
    pub fn count(&self, label: &str) -> usize {
        self.actions.iter().filter(|a| a.label() == label).count()
    }
}

pub struct Reconciler<'a> {
    workspace: &'a Workspace,
    filter: &'a StampFilter,
}

impl<'a> Reconciler<'a> {
    pub fn new(workspace: &'a Workspace, filter: &'a StampFilter) -> Self {
        Self { workspace, filter }
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, ReconcileError> {
        let path = self.workspace.on_disk(path);
        std::fs::read(&path).map_err(|source| ReconcileError::Io { path, source })
    }

    fn read_normalized(&self, path: &Path) -> Result<Vec<u8>, ReconcileError> {
        let raw = self.read(path)?;
        Ok(self.filter.normalize(&raw).into_owned())
    }

    /// Decide every action needed to make the working copy mirror the export.
    ///
    /// Fails with [`ReconcileError::AmbiguousMatch`] when a created file
    /// matches more than one deleted file.
    #[instrument(skip_all, fields(created = diff.created.len(), deleted = diff.deleted.len()))]
    pub fn plan(&self, diff: &TreeDiff) -> Result<ReconcilePlan, ReconcileError> {
        let ws = self.workspace;
        let mut actions = Vec::new();

        let mut deleted = Vec::with_capacity(diff.deleted.len());
        for name in &diff.deleted {
            deleted.push((name.as_str(), self.read_normalized(&ws.svn_file(name))?));
        }

        let mut creates = Vec::with_capacity(diff.created.len());
        for created in &diff.created {
            let content = self.read_normalized(&ws.git_file(created))?;
            let matches: Vec<&str> = deleted
                .iter()
                .filter(|(_, data)| *data == content)
                .map(|(name, _)| *name)
                .collect();

            match matches.as_slice() {
                [] => creates.push(Action::Add {
                    path: created.clone(),
                }),
                [from] => creates.push(Action::Copy {
                    from: from.to_string(),
                    to: created.clone(),
                }),
                _ => {
                    return Err(ReconcileError::AmbiguousMatch {
                        created: created.clone(),
                        candidates: matches.iter().map(|m| m.to_string()).collect(),
                    })
                }
            }
        }

        // A path that turns from file into directory (or back) has to be
        // deleted before the created entry can be written.
        let sources: HashSet<&str> = creates
            .iter()
            .filter_map(|action| match action {
                Action::Copy { from, .. } => Some(from.as_str()),
                _ => None,
            })
            .collect();
        let mut early = Vec::new();
        let mut late = Vec::new();
        for path in &diff.deleted {
            let delete = Action::Delete { path: path.clone() };
            let blocks = diff
                .created
                .iter()
                .any(|created| is_under(created, path) || is_under(path, created));
            if blocks && !sources.contains(path.as_str()) {
                early.push(delete);
            } else {
                late.push(delete);
            }
        }
        for created in &diff.created {
            let mut children = diff.deleted.iter().filter(|d| is_under(d, created)).peekable();
            if children.peek().is_some() && children.all(|d| !sources.contains(d.as_str())) {
                early.push(Action::Delete {
                    path: created.clone(),
                });
            }
        }

        actions.extend(early);
        actions.extend(creates);
        actions.extend(late);

        for common in diff.common() {
            let git = self.read(&ws.git_file(common))?;
            let svn = self.read(&ws.svn_file(common))?;
            if !self.filter.same_content(&git, &svn) {
                actions.push(Action::Update {
                    path: common.to_string(),
                });
            }
        }

        debug!(actions = actions.len(), "reconcile plan ready");
        Ok(ReconcilePlan { actions })
    }

    /// Execute `plan` against the working copy.
    #[instrument(skip_all, fields(actions = plan.actions.len()))]
    pub async fn apply<R: CommandRunner>(
        &self,
        plan: &ReconcilePlan,
        svn: &SvnClient<'_, R>,
    ) -> Result<(), ReconcileError> {
        let ws = self.workspace;
        for action in &plan.actions {
            match action {
                Action::Copy { from, to } => {
                    svn.copy(&ws.svn_file(from), &ws.svn_file(to)).await?;
                }
                Action::Add { path } => {
                    self.copy_raw(path)?;
                    svn.add(&ws.svn_file(path)).await?;
                }
                Action::Delete { path } => {
                    let target = ws.svn_file(path);
                    if ws.on_disk(&target).exists() {
                        svn.delete(&target).await?;
                    }
                }
                Action::Update { path } => {
                    self.copy_raw(path)?;
                }
            }
            debug!(action = action.label(), path = action.path(), "applied");
        }
        info!(
            copies = plan.count("copy"),
            adds = plan.count("add"),
            deletes = plan.count("delete"),
            updates = plan.count("update"),
            "working copy reconciled"
        );
        Ok(())
    }

    /// Copy the unmodified Git bytes of `rel` over the SVN side.
    fn copy_raw(&self, rel: &str) -> Result<(), ReconcileError> {
        let ws = self.workspace;
        let src = ws.on_disk(&ws.git_file(rel));
        let dst = ws.on_disk(&ws.svn_file(rel));
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ReconcileError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::copy(&src, &dst).map_err(|source| ReconcileError::Io { path: src, source })?;
        Ok(())
    }
}

/// Whether `path` lies inside the directory `dir`.
fn is_under(path: &str, dir: &str) -> bool {
    path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
}
