//! Error types for the gitsvnpush core library.
//!
//! Each stage of the push pipeline has its own error type derived with
//! `thiserror`, and a top-level [`PushError`] enum unifies them for callers
//! that want a single error type.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for a push run. Every variant is terminal for the run.
#[derive(Debug, Error)]
pub enum PushError {
    /// Wrong invocation location or a disallowed branch argument.
    #[error("usage: gitsvnpush push <svn_branch_path>\n{0}")]
    Usage(String),

    /// The operator declined to reuse an existing work directory.
    #[error("user abort")]
    UserAbort,

    /// Reading the operator's answer failed.
    #[error("failed to read confirmation: {0}")]
    Prompt(#[source] std::io::Error),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Filesystem error outside of reconciliation (work directory, log file).
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Errors from running external commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The shell used to run commands could not be found.
    #[error("shell not found: {0}")]
    ShellNotFound(String),

    /// A command exited with a non-zero status.
    #[error("{command}\n\n{output}\ngitsvnpush exiting because command above failed (exit {exit_code})")]
    Failed {
        command: String,
        exit_code: i32,
        output: String,
    },

    /// Spawning or waiting on the child process failed.
    #[error("failed to run '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// An expected pattern was absent from external command output.
#[derive(Debug, Error)]
pub enum ParseError {
    /// `svn info` output had no `Last Changed Rev:` line.
    #[error("no 'Last Changed Rev' in svn info output:\n{0}")]
    MissingRevision(String),

    /// `svn log` output had no `<git repository> <hash>` reference.
    #[error("no '{repository} <hash>' reference in svn log output:\n{output}")]
    MissingEmbeddedHash { repository: String, output: String },

    /// `git show-ref` output did not list the requested ref.
    #[error("ref '{reference}' not found in git show-ref output:\n{output}")]
    MissingRef { reference: String, output: String },
}

// ---------------------------------------------------------------------------
// Reconcile errors
// ---------------------------------------------------------------------------

/// Errors from walking, comparing, and mirroring the two trees.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A created file matched more than one deleted file.
    #[error("created file '{created}' matches more than one deleted file: {}", candidates.join(", "))]
    AmbiguousMatch {
        created: String,
        candidates: Vec<String>,
    },

    /// The Git export unexpectedly contains SVN metadata.
    #[error("git export contains svn metadata directory: {}", .0.display())]
    MetadataInExport(PathBuf),

    /// Walking a directory tree failed.
    #[error("failed to walk '{}': {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Reading, writing, or copying a file failed.
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Command(#[from] CommandError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
