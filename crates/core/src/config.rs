//! Configuration for gitsvnpush.
//!
//! Loaded from a TOML file (by default `gitsvnpush.toml` in the project root).
//! Only the two repository URLs are required; everything else has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration for a push run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Subversion repository the branch is pushed into.
    pub svn: SvnConfig,

    /// Git repository the branch is taken from.
    pub git: GitConfig,

    /// Local work directory layout.
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Comparison and invocation options.
    #[serde(default)]
    pub options: OptionsConfig,
}

// ---------------------------------------------------------------------------
// SVN
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvnConfig {
    /// Repository root URL; branch paths (`trunk`, `branches/X`) are appended.
    pub repository: String,
}

// ---------------------------------------------------------------------------
// Git
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Public repository URL. Also the prefix searched for in SVN log
    /// messages to recover the last pushed Git hash.
    pub repository: String,

    /// Remote whose tracking refs are read (default `origin`).
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Git branch corresponding to SVN `trunk` (default `master`).
    #[serde(default = "default_mainline")]
    pub mainline: String,

    /// How the Git snapshot is produced.
    #[serde(default)]
    pub export: ExportMethod,
}

/// How the clean Git snapshot directory is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMethod {
    /// `git archive <ref> | tar -x -C <dir>` from the local clone.
    #[default]
    Archive,
    /// `svn export <git repository>/<git path> <dir>` through a hosting
    /// service's Subversion bridge.
    SvnBridge,
}

fn default_remote() -> String {
    "origin".into()
}

fn default_mainline() -> String {
    "master".into()
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Work directory, relative to the project root unless absolute.
    #[serde(default = "default_work_directory")]
    pub directory: PathBuf,

    /// Name of the commit-message file written into the SVN working copy.
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_work_directory() -> PathBuf {
    PathBuf::from("build/gitsvnpush")
}

fn default_log_file() -> String {
    "gitsvnpush.log".into()
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            directory: default_work_directory(),
            log_file: default_log_file(),
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Literal token identifying version-stamp lines. Any line containing it
    /// is ignored when comparing file contents.
    #[serde(default = "default_stamp_marker")]
    pub stamp_marker: String,

    /// Entry that must exist in the current directory for a run to start.
    #[serde(default = "default_root_marker")]
    pub root_marker: String,
}

fn default_stamp_marker() -> String {
    "$Id".into()
}

fn default_root_marker() -> String {
    ".git".into()
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            stamp_marker: default_stamp_marker(),
            root_marker: default_root_marker(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl PushConfig {
    /// Load a [`PushConfig`] from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: PushConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Validate that all required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.svn.repository.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "svn.repository".into(),
                detail: "SVN repository URL must not be empty".into(),
            });
        }
        if self.git.repository.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "git.repository".into(),
                detail: "Git repository URL must not be empty".into(),
            });
        }
        if self.svn.repository.ends_with('/') || self.git.repository.ends_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "repository".into(),
                detail: "repository URLs must not end with '/'".into(),
            });
        }
        if self.git.remote.is_empty() || self.git.mainline.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "git.remote".into(),
                detail: "remote and mainline names must not be empty".into(),
            });
        }
        if self.workspace.directory.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "workspace.directory".into(),
                detail: "work directory must not be empty".into(),
            });
        }
        if self.workspace.log_file.is_empty() || self.workspace.log_file.contains('/') {
            return Err(ConfigError::InvalidValue {
                field: "workspace.log_file".into(),
                detail: "log file must be a plain file name".into(),
            });
        }
        if self.options.stamp_marker.contains('\n') || self.options.stamp_marker.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "options.stamp_marker".into(),
                detail: "stamp marker must be a non-empty single-line token".into(),
            });
        }
        if self.options.root_marker.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "options.root_marker".into(),
                detail: "root marker must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Convenience: load and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Generate a default TOML config template string.
    pub fn default_template() -> &'static str {
        r#"# gitsvnpush configuration

[svn]
repository = "https://svn.example.com/svn/project"

[git]
repository = "https://github.com/owner/project"
remote = "origin"
mainline = "master"
# "archive" runs git archive on the local clone;
# "svn-bridge" runs svn export against the git host's subversion bridge.
export = "archive"

[workspace]
directory = "build/gitsvnpush"
log_file = "gitsvnpush.log"

[options]
stamp_marker = "$Id"
root_marker = ".git"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_toml() -> &'static str {
        r#"
[svn]
repository = "https://projects.example.org/svn/Project"

[git]
repository = "https://github.com/example/project"
remote = "upstream"
mainline = "main"
export = "svn-bridge"

[workspace]
directory = "/tmp/gitsvnpush-work"
log_file = "merge.log"

[options]
stamp_marker = "$Revision"
root_marker = "configure.ac"
"#
    }

    #[test]
    fn test_parse_full_config() {
        let config: PushConfig = toml::from_str(sample_toml()).expect("failed to parse toml");
        assert_eq!(config.svn.repository, "https://projects.example.org/svn/Project");
        assert_eq!(config.git.remote, "upstream");
        assert_eq!(config.git.mainline, "main");
        assert_eq!(config.git.export, ExportMethod::SvnBridge);
        assert_eq!(config.workspace.directory, PathBuf::from("/tmp/gitsvnpush-work"));
        assert_eq!(config.workspace.log_file, "merge.log");
        assert_eq!(config.options.stamp_marker, "$Revision");
        assert_eq!(config.options.root_marker, "configure.ac");
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let minimal = r#"
[svn]
repository = "https://svn.example.com/repo"
[git]
repository = "https://github.com/owner/repo"
"#;
        let config: PushConfig = toml::from_str(minimal).unwrap();
        assert_eq!(config.git.remote, "origin");
        assert_eq!(config.git.mainline, "master");
        assert_eq!(config.git.export, ExportMethod::Archive);
        assert_eq!(config.workspace.directory, PathBuf::from("build/gitsvnpush"));
        assert_eq!(config.workspace.log_file, "gitsvnpush.log");
        assert_eq!(config.options.stamp_marker, "$Id");
        assert_eq!(config.options.root_marker, ".git");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gitsvnpush.toml");
        std::fs::write(&path, sample_toml()).unwrap();

        let config = PushConfig::load_and_validate(&path).expect("load failed");
        assert_eq!(config.workspace.log_file, "merge.log");
    }

    #[test]
    fn test_file_not_found() {
        let result = PushConfig::load_from_file("/nonexistent/gitsvnpush.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gitsvnpush.toml");
        std::fs::write(&path, "[svn\nrepository = ").unwrap();
        let result = PushConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validate_rejects_empty_repository() {
        let mut config: PushConfig = toml::from_str(sample_toml()).unwrap();
        config.svn.repository = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "svn.repository"
        ));
    }

    #[test]
    fn test_validate_rejects_trailing_slash() {
        let mut config: PushConfig = toml::from_str(sample_toml()).unwrap();
        config.git.repository.push('/');
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nested_log_file() {
        let mut config: PushConfig = toml::from_str(sample_toml()).unwrap();
        config.workspace.log_file = "logs/merge.log".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "workspace.log_file"
        ));
    }

    #[test]
    fn test_default_template_is_valid() {
        let config: PushConfig = toml::from_str(PushConfig::default_template())
            .expect("default template should be valid TOML");
        config.validate().unwrap();
    }
}
