//! Mapping between the SVN branch argument and the Git side of a push.

use std::path::Path;

use tracing::debug;

use crate::errors::PushError;

/// A resolved push target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSpec {
    /// Path below the SVN repository root: `trunk` or `branches/<name>`.
    pub svn_path: String,
    /// Path of the same branch on the Git side (used by the SVN bridge).
    pub git_path: String,
    /// Fully qualified remote-tracking ref, e.g. `refs/remotes/origin/master`.
    pub git_ref: String,
}

impl BranchSpec {
    /// Resolve the command-line branch argument.
    ///
    /// `trunk` maps to the `mainline` branch of `remote`; a bare name is
    /// placed under `branches/`.
    pub fn resolve(svn_branch_path: &str, remote: &str, mainline: &str) -> Result<Self, PushError> {
        check_argument(svn_branch_path)?;
        let svn_path = svn_branch_path.trim_end_matches('/');

        let git_path = if svn_path == "trunk" || svn_path.starts_with("branches/") {
            svn_path.to_string()
        } else {
            format!("branches/{svn_path}")
        };
        let git_ref = if svn_path == "trunk" {
            format!("refs/remotes/{remote}/{mainline}")
        } else {
            format!("refs/remotes/{remote}/{git_path}")
        };

        let spec = Self {
            svn_path: git_path.clone(),
            git_path,
            git_ref,
        };
        debug!(svn = %spec.svn_path, git_ref = %spec.git_ref, "resolved branch");
        Ok(spec)
    }
}

/// Reject a branch argument that can never name an SVN branch. Needs no
/// configuration, so it runs before anything is loaded.
pub fn check_argument(svn_branch_path: &str) -> Result<(), PushError> {
    match svn_branch_path.trim_end_matches('/') {
        "" => Err(PushError::Usage("svn_branch_path must not be empty".into())),
        "master" => Err(PushError::Usage(
            "trunk is the svn_branch_path for the master branch".into(),
        )),
        _ => Ok(()),
    }
}

/// Fail with a usage error unless `root` contains `marker`.
///
/// Relative work directories and the `git` commands all assume the process
/// runs from the project root.
pub fn check_invocation(root: &Path, marker: &str) -> Result<(), PushError> {
    if root.join(marker).exists() {
        Ok(())
    } else {
        Err(PushError::Usage(format!(
            "gitsvnpush must be executed from the project root ('{}' not found in {})",
            marker,
            root.display()
        )))
    }
}
