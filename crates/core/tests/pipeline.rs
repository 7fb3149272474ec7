//! Full push runs over real directory trees with scripted `svn`/`git` output.

mod common;

use common::{read, write, ScriptedRunner, CONFIG};
use gitsvnpush_core::prompt::AssumeYes;
use gitsvnpush_core::{Action, PushConfig, PushError, PushPipeline};

const SVN_LOG: &str = "\
------------------------------------------------------------------------
r12 | dev | 2020-01-01 10:00:00 +0000 (Wed, 01 Jan 2020) | 3 lines

merge to branch: branches/1.0
from repository: https://github.com/example/project aaa111
------------------------------------------------------------------------
";

const GIT_LOG: &str = "\
commit ddd444
    rename old.txt

commit ccc333
    edit and add files

commit aaa111
    previous push
";

/// A project root with both work trees already present, so the run reuses
/// them instead of checking out and exporting.
fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir(root.join(".git")).unwrap();

    std::fs::create_dir_all(root.join("work/svn/.svn")).unwrap();
    write(root, "work/svn/.svn/wc.db", "metadata");
    write(root, "work/svn/old.txt", "// $Id: old.txt 3 2019-12-01 dev $\nshared body\n");
    write(root, "work/svn/keep.txt", "same\n");
    write(root, "work/svn/edit.txt", "v1\n");
    write(root, "work/svn/gone.txt", "bye\n");

    write(root, "work/git/new/moved.txt", "// $Id$\nshared body\n");
    write(root, "work/git/keep.txt", "same\n");
    write(root, "work/git/edit.txt", "v2\n");
    write(root, "work/git/added.txt", "hello\n");
    dir
}

fn runner() -> ScriptedRunner {
    ScriptedRunner::default()
        .respond("git show-ref", "ddd444 refs/remotes/origin/branches/1.0\n")
        .respond("svn info", "Path: work/svn\nLast Changed Rev: 12\n")
        .respond("svn log", SVN_LOG)
        .respond("git log", GIT_LOG)
}

fn config() -> PushConfig {
    toml::from_str(CONFIG).unwrap()
}

#[tokio::test]
async fn push_reconciles_and_writes_merge_log() {
    let dir = project();
    let root = dir.path();
    let config = config();
    let runner = runner();

    let report = PushPipeline::new(root, &config, &runner)
        .run("1.0", &mut AssumeYes)
        .await
        .unwrap();

    assert_eq!(
        runner.commands(),
        vec![
            "git show-ref refs/remotes/origin/branches/1.0",
            "svn revert --recursive work/svn",
            "svn status work/svn",
            "svn info work/svn",
            "svn log -r 12 work/svn",
            "svn add --parents work/svn/added.txt",
            "svn copy --parents work/svn/old.txt work/svn/new/moved.txt",
            "svn delete --force work/svn/gone.txt",
            "svn delete --force work/svn/old.txt",
            "git log refs/remotes/origin/branches/1.0",
        ]
    );

    assert_eq!(report.start_hash.as_str(), "aaa111");
    assert_eq!(report.end_hash.as_str(), "ddd444");
    assert_eq!(
        report.plan.actions,
        vec![
            Action::Add {
                path: "added.txt".into()
            },
            Action::Copy {
                from: "old.txt".into(),
                to: "new/moved.txt".into()
            },
            Action::Delete {
                path: "gone.txt".into()
            },
            Action::Delete {
                path: "old.txt".into()
            },
            Action::Update {
                path: "edit.txt".into()
            },
        ]
    );

    assert_eq!(read(root, "work/svn/added.txt"), "hello\n");
    assert_eq!(read(root, "work/svn/edit.txt"), "v2\n");
    assert_eq!(read(root, "work/svn/keep.txt"), "same\n");

    let log_path = report.log_path.unwrap();
    assert_eq!(log_path, root.join("work/svn/gitsvnpush.log"));
    assert_eq!(
        std::fs::read_to_string(log_path).unwrap(),
        "merge to branch: branches/1.0\n\
         from repository: https://github.com/example/project ddd444\n\
         to repository:   https://svn.example.org/svn/Project\n\
         start hash code:  aaa111\n\
         end   hash code:  ddd444\n\
         \n\
         commit ddd444\n    rename old.txt\n\ncommit ccc333\n    edit and add files\n\n"
    );
}

#[tokio::test]
async fn dry_run_leaves_working_copy_alone() {
    let dir = project();
    let root = dir.path();
    let config = config();
    let runner = runner();

    let report = PushPipeline::new(root, &config, &runner)
        .dry_run(true)
        .run("branches/1.0", &mut AssumeYes)
        .await
        .unwrap();

    assert_eq!(report.plan.actions.len(), 5);
    assert!(report.log_path.is_none());
    assert_eq!(read(root, "work/svn/edit.txt"), "v1\n");
    assert!(!root.join("work/svn/added.txt").exists());
    assert!(!runner
        .commands()
        .iter()
        .any(|c| c.starts_with("svn add") || c.starts_with("git log")));
}

#[tokio::test]
async fn ambiguous_rename_aborts_before_any_change() {
    let dir = project();
    let root = dir.path();
    write(root, "work/svn/copy_of_old.txt", "// $Id: copy $\nshared body\n");
    let config = config();
    let runner = runner();

    let err = PushPipeline::new(root, &config, &runner)
        .run("1.0", &mut AssumeYes)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("new/moved.txt"));
    assert!(matches!(err, PushError::Reconcile(_)));
    assert!(!runner.commands().iter().any(|c| c.starts_with("svn copy")));
    assert!(!root.join("work/svn/added.txt").exists());
}
