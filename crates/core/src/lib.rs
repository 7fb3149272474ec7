//! gitsvnpush core library.
//!
//! Mirrors the tree of a Git branch into the matching Subversion branch:
//! branch resolution, `svn`/`git` command clients, work directory
//! preparation, tree differencing, reconciliation and the merge log that
//! the operator commits with.

pub mod branch;
pub mod config;
pub mod errors;
pub mod git;
pub mod merge_log;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod reconcile;
pub mod runner;
pub mod stamp;
pub mod svn;
pub mod tree;
pub mod workspace;

// Re-exports for convenience.
pub use config::PushConfig;
pub use errors::PushError;
pub use pipeline::{PushPipeline, PushReport};
pub use reconcile::{Action, ReconcilePlan};
pub use runner::{CommandRunner, ShellRunner};
