//! File-tree enumeration and created/deleted set computation.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

use crate::errors::ReconcileError;

/// Name of Subversion's per-directory metadata folder.
pub const SVN_META_DIR: &str = ".svn";

fn is_svn_meta(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == SVN_META_DIR
}

/// `/`-separated path of `path` relative to `root`.
fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Regular files under an SVN working copy, skipping `.svn` metadata.
#[instrument(fields(root = %root.display()))]
pub fn walk_working_copy(root: &Path) -> Result<Vec<String>, ReconcileError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_svn_meta(e))
    {
        let entry = entry.map_err(|source| ReconcileError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() {
            files.push(relative_name(root, entry.path()));
        }
    }
    debug!(count = files.len(), "walked svn working copy");
    Ok(files)
}

/// Regular files under a Git export. SVN metadata here means the export
/// directory is not what it claims to be, which is fatal.
#[instrument(fields(root = %root.display()))]
pub fn walk_export(root: &Path) -> Result<Vec<String>, ReconcileError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ReconcileError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if is_svn_meta(&entry) {
            return Err(ReconcileError::MetadataInExport(entry.into_path()));
        }
        if entry.file_type().is_file() {
            files.push(relative_name(root, entry.path()));
        }
    }
    debug!(count = files.len(), "walked git export");
    Ok(files)
}

/// The two file lists and their differences, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDiff {
    pub svn_files: Vec<String>,
    pub git_files: Vec<String>,
    /// In the Git export only.
    pub created: Vec<String>,
    /// In the SVN working copy only.
    pub deleted: Vec<String>,
}

impl TreeDiff {
    pub fn compute(svn_files: Vec<String>, git_files: Vec<String>) -> Self {
        let svn_set: HashSet<&str> = svn_files.iter().map(String::as_str).collect();
        let git_set: HashSet<&str> = git_files.iter().map(String::as_str).collect();

        let created = git_files
            .iter()
            .filter(|f| !svn_set.contains(f.as_str()))
            .cloned()
            .collect();
        let deleted = svn_files
            .iter()
            .filter(|f| !git_set.contains(f.as_str()))
            .cloned()
            .collect();

        Self {
            svn_files,
            git_files,
            created,
            deleted,
        }
    }

    /// Walk both trees and diff them.
    pub fn scan(svn_root: &Path, git_root: &Path) -> Result<Self, ReconcileError> {
        let svn_files = walk_working_copy(svn_root)?;
        let git_files = walk_export(git_root)?;
        let diff = Self::compute(svn_files, git_files);
        debug!(
            created = diff.created.len(),
            deleted = diff.deleted.len(),
            "computed tree diff"
        );
        Ok(diff)
    }

    /// Files present in both trees, in Git walk order.
    pub fn common(&self) -> impl Iterator<Item = &str> {
        let created: HashSet<&str> = self.created.iter().map(String::as_str).collect();
        self.git_files
            .iter()
            .map(String::as_str)
            .filter(move |f| !created.contains(f))
    }
}
