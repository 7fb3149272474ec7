//! Parsers for plain-text `git` output.

use tracing::debug;

use crate::errors::ParseError;
use crate::models::CommitHash;

/// Extract the hash `git show-ref` lists for exactly `reference`.
///
/// `show-ref` matches patterns by trailing path components, so several refs
/// may be printed; only the line naming `reference` counts.
pub fn extract_ref_hash(output: &str, reference: &str) -> Result<CommitHash, ParseError> {
    let hash = output
        .lines()
        .filter_map(|line| line.split_once(' '))
        .find(|(hash, name)| {
            name.trim_end() == reference
                && !hash.is_empty()
                && hash.chars().all(|c| c.is_ascii_hexdigit())
        })
        .map(|(hash, _)| CommitHash::new(hash))
        .ok_or_else(|| ParseError::MissingRef {
            reference: reference.to_string(),
            output: output.to_string(),
        })?;
    debug!(reference, %hash, "parsed ref hash");
    Ok(hash)
}

/// Keep the lines of `log` before the first line mentioning `hash`.
///
/// Same result as `sed -e '/<hash>/,$d'`: the matching line and everything
/// after it are dropped; with no match the log is returned whole.
pub fn truncate_log(log: &str, hash: &CommitHash) -> String {
    let mut end = 0;
    for line in log.split_inclusive('\n') {
        if line.contains(hash.as_str()) {
            return log[..end].to_string();
        }
        end += line.len();
    }
    log.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW_REF: &str = "\
5e1b7d2c9a0f3e4d6b8a1c2e3f4a5b6c7d8e9f00 refs/remotes/upstream/origin/master
0a1b2c3d4e5f60718293a4b5c6d7e8f901234567 refs/remotes/origin/master
";

    const GIT_LOG: &str = "\
commit ccc333
Author: Dev <dev@example.org>

    third change

commit bbb222
Author: Dev <dev@example.org>

    second change

commit aaa111
Author: Dev <dev@example.org>

    first change
";

    #[test]
    fn test_extract_ref_hash_exact_ref() {
        let hash = extract_ref_hash(SHOW_REF, "refs/remotes/origin/master").unwrap();
        assert_eq!(hash.as_str(), "0a1b2c3d4e5f60718293a4b5c6d7e8f901234567");
    }

    #[test]
    fn test_extract_ref_hash_missing() {
        let err = extract_ref_hash(SHOW_REF, "refs/remotes/origin/branches/1.0").unwrap_err();
        assert!(matches!(err, ParseError::MissingRef { .. }));
        assert!(extract_ref_hash("", "refs/remotes/origin/master").is_err());
    }

    #[test]
    fn test_truncate_log_at_start_hash() {
        let out = truncate_log(GIT_LOG, &CommitHash::new("bbb222"));
        assert_eq!(
            out,
            "commit ccc333\nAuthor: Dev <dev@example.org>\n\n    third change\n\n"
        );
    }

    #[test]
    fn test_truncate_log_first_line() {
        assert_eq!(truncate_log(GIT_LOG, &CommitHash::new("ccc333")), "");
    }

    #[test]
    fn test_truncate_log_no_match_keeps_everything() {
        assert_eq!(truncate_log(GIT_LOG, &CommitHash::new("fff999")), GIT_LOG);
    }
}
