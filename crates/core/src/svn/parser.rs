//! Parsers for plain-text `svn` output.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::errors::ParseError;
use crate::models::{CommitHash, Revision};

static LAST_CHANGED_REV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Last Changed Rev: ([0-9]+)").expect("valid regex"));

/// Extract `Last Changed Rev` from `svn info` output.
pub fn extract_revision(info: &str) -> Result<Revision, ParseError> {
    let rev = LAST_CHANGED_REV
        .captures(info)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .map(Revision)
        .ok_or_else(|| ParseError::MissingRevision(info.to_string()))?;
    debug!(%rev, "parsed last changed revision");
    Ok(rev)
}

/// Extract the Git hash recorded after `repository` in an `svn log` message.
///
/// Pushes record their end hash as `<git repository> <hash>` in the commit
/// message; the first such reference wins.
pub fn extract_embedded_hash(log: &str, repository: &str) -> Result<CommitHash, ParseError> {
    let pattern = format!("{} ([0-9a-f]+)", regex_lite::escape(repository));
    let missing = || ParseError::MissingEmbeddedHash {
        repository: repository.to_string(),
        output: log.to_string(),
    };
    let re = Regex::new(&pattern).map_err(|_| missing())?;
    let hash = re
        .captures(log)
        .map(|caps| CommitHash::new(&caps[1]))
        .ok_or_else(missing)?;
    debug!(%hash, "parsed embedded git hash");
    Ok(hash)
}

/// Paths reported as unversioned (`?`) by `svn status`.
pub fn parse_unversioned(status: &str) -> Vec<String> {
    status
        .lines()
        .filter_map(|line| {
            let rest = line.strip_prefix('?')?;
            let path = rest.trim_start().trim_end_matches('\r');
            (!path.is_empty()).then(|| path.to_string())
        })
        .collect()
}
