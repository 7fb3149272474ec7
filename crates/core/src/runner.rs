//! External command execution.
//!
//! Every interaction with `svn`, `git`, and `tar` goes through a
//! [`CommandRunner`], so the pipeline can be driven by a fake in tests.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::CommandError;

/// Runs shell command strings and returns their combined output.
///
/// Implementations must treat a non-zero exit as an error carrying the
/// command and everything it printed.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `cmd` to completion and return stdout with stderr merged in.
    ///
    /// Output is decoded as UTF-8 lossily: invalid bytes, such as a
    /// Latin-1 author name in `git log`, become U+FFFD.
    async fn run(&self, cmd: &str) -> Result<String, CommandError>;

    /// Echo `cmd` to the console, then [`run`](Self::run) it.
    async fn run_logged(&self, cmd: &str) -> Result<String, CommandError> {
        println!("{cmd}");
        self.run(cmd).await
    }
}

/// Runs commands through `sh -c` with the project root as working directory.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    root: PathBuf,
    shell: String,
}

impl ShellRunner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            shell: "sh".into(),
        }
    }
}

impl CommandRunner for ShellRunner {
    async fn run(&self, cmd: &str) -> Result<String, CommandError> {
        // Redirect the shell's own stderr first so every stage of a pipeline
        // writes into the captured stream.
        let script = format!("exec 2>&1\n{cmd}");

        debug!(cmd, root = %self.root.display(), "running command");
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(&script)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CommandError::ShellNotFound(self.shell.clone())
                } else {
                    CommandError::Io {
                        command: cmd.to_string(),
                        source: e,
                    }
                }
            })?;

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(cmd, exit_code, "command failed");
            return Err(CommandError::Failed {
                command: cmd.to_string(),
                exit_code,
                output: text,
            });
        }
        Ok(text)
    }
}

/// Quote `arg` for `sh` when it contains anything outside a safe set.
pub fn shell_quote(arg: &str) -> Cow<'_, str> {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=@%+,".contains(c));
    if safe {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}

/// [`shell_quote`] for a path.
pub fn quote_path(path: &Path) -> String {
    shell_quote(&path.to_string_lossy()).into_owned()
}
