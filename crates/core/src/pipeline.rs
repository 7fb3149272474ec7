//! One push run, from branch argument to merge log.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::branch::{check_invocation, BranchSpec};
use crate::config::PushConfig;
use crate::errors::{ConfigError, PushError};
use crate::git::{truncate_log, GitClient};
use crate::merge_log::{log_path, MergeLog};
use crate::models::CommitHash;
use crate::prompt::Confirm;
use crate::reconcile::{ReconcilePlan, Reconciler};
use crate::runner::CommandRunner;
use crate::stamp::StampFilter;
use crate::svn::{extract_embedded_hash, SvnClient};
use crate::tree::TreeDiff;
use crate::workspace::Workspace;

/// Outcome of a push run.
#[derive(Debug, Clone)]
pub struct PushReport {
    pub branch: BranchSpec,
    /// Git hash recorded by the last SVN commit on the branch.
    pub start_hash: CommitHash,
    /// Current tip of the Git branch.
    pub end_hash: CommitHash,
    pub plan: ReconcilePlan,
    /// Working copy to commit from, relative to the project root.
    pub svn_dir: PathBuf,
    /// Where the merge log was written; `None` on a dry run.
    pub log_path: Option<PathBuf>,
}

/// Drives a push against a project root.
pub struct PushPipeline<'a, R> {
    root: &'a Path,
    config: &'a PushConfig,
    runner: &'a R,
    dry_run: bool,
}

impl<'a, R: CommandRunner> PushPipeline<'a, R> {
    /// `runner` must execute commands with `root` as working directory.
    pub fn new(root: &'a Path, config: &'a PushConfig, runner: &'a R) -> Self {
        Self {
            root,
            config,
            runner,
            dry_run: false,
        }
    }

    /// Stop after planning: the working copy is left as prepared and no
    /// merge log is written.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[instrument(skip(self, confirm), fields(dry_run = self.dry_run))]
    pub async fn run<C: Confirm + ?Sized>(
        &self,
        svn_branch_path: &str,
        confirm: &mut C,
    ) -> Result<PushReport, PushError> {
        let config = self.config;
        check_invocation(self.root, &config.options.root_marker)?;
        let branch =
            BranchSpec::resolve(svn_branch_path, &config.git.remote, &config.git.mainline)?;
        let filter = StampFilter::new(&config.options.stamp_marker).map_err(|e| {
            ConfigError::InvalidValue {
                field: "options.stamp_marker".into(),
                detail: e.to_string(),
            }
        })?;

        let git = GitClient::new(self.runner);
        let svn = SvnClient::new(self.runner);
        let ws = Workspace::new(self.root, &config.workspace.directory);

        let end_hash = git.tip(&branch.git_ref).await?;
        info!(%end_hash, git_ref = %branch.git_ref, "git branch tip");

        ws.ensure_directory()?;
        ws.prepare_svn(&svn, confirm, &config.svn.repository, &branch)
            .await?;

        let revision = svn.last_changed_rev(ws.svn_dir()).await?;
        let svn_log = svn.log(revision, ws.svn_dir()).await?;
        let start_hash = extract_embedded_hash(&svn_log, &config.git.repository)?;
        info!(%revision, %start_hash, "last pushed git hash");

        ws.prepare_git(self.runner, confirm, config, &branch).await?;

        let diff = TreeDiff::scan(&ws.on_disk(ws.svn_dir()), &ws.on_disk(ws.git_dir()))?;
        let reconciler = Reconciler::new(&ws, &filter);
        let plan = reconciler.plan(&diff)?;

        let mut report = PushReport {
            branch,
            start_hash,
            end_hash,
            plan,
            svn_dir: ws.svn_dir().to_path_buf(),
            log_path: None,
        };
        if self.dry_run {
            info!(actions = report.plan.actions.len(), "dry run, working copy untouched");
            return Ok(report);
        }

        reconciler.apply(&report.plan, &svn).await?;

        let full_log = git.log(&report.branch.git_ref).await?;
        let log = truncate_log(&full_log, &report.start_hash);
        let path = ws.on_disk(&log_path(ws.svn_dir(), &config.workspace.log_file));
        MergeLog {
            branch: &report.branch.svn_path,
            git_repository: &config.git.repository,
            svn_repository: &config.svn.repository,
            start: &report.start_hash,
            end: &report.end_hash,
            log: &log,
        }
        .write(&path)?;

        report.log_path = Some(path);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::AssumeYes;
    use crate::runner::fake::RecordingRunner;

    fn config() -> PushConfig {
        toml::from_str(
            r#"
[svn]
repository = "https://svn.example.org/svn/Project"
[git]
repository = "https://github.com/example/project"
[workspace]
directory = "work"
"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_master_rejected_before_any_command() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let config = config();
        let runner = RecordingRunner::default();

        let err = PushPipeline::new(dir.path(), &config, &runner)
            .run("master", &mut AssumeYes)
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::Usage(ref m) if m.contains("trunk")));
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_directory_is_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config();
        let runner = RecordingRunner::default();

        let err = PushPipeline::new(dir.path(), &config, &runner)
            .run("trunk", &mut AssumeYes)
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::Usage(_)));
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_missing_embedded_hash_stops_before_export() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let config = config();
        let runner = RecordingRunner::default()
            .respond("git show-ref", "abc123 refs/remotes/origin/master\n")
            .respond("svn info", "Last Changed Rev: 5\n")
            .respond("svn log", "r5 | dev | manual commit\n");

        let err = PushPipeline::new(dir.path(), &config, &runner)
            .run("trunk", &mut AssumeYes)
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::Parse(_)));
        assert!(!runner.commands().iter().any(|c| c.starts_with("git archive")));
    }
}
