//! Version-stamp line filtering for content comparison.
//!
//! Keyword-expanded lines such as `$Id: file.cpp 3709 ... $` differ between
//! the two trees even when nothing real changed. Comparisons blank every line
//! containing the marker; files are always written with their raw bytes.

use std::borrow::Cow;

use regex::bytes::Regex;

/// Blanks lines containing a version-stamp marker.
#[derive(Debug, Clone)]
pub struct StampFilter {
    pattern: Regex,
}

impl StampFilter {
    /// Build a filter for the literal `marker` token (e.g. `$Id`).
    pub fn new(marker: &str) -> Result<Self, regex::Error> {
        // (?-u): `.` matches any byte but '\n', so non-UTF-8 files still work.
        let pattern = Regex::new(&format!(r"(?m-u)^.*{}.*", regex::escape(marker)))?;
        Ok(Self { pattern })
    }

    /// Content with every marker line emptied; line breaks are kept.
    pub fn normalize<'a>(&self, content: &'a [u8]) -> Cow<'a, [u8]> {
        self.pattern.replace_all(content, &b""[..])
    }

    /// Whether two contents are equal once stamp lines are ignored.
    pub fn same_content(&self, a: &[u8], b: &[u8]) -> bool {
        self.normalize(a) == self.normalize(b)
    }
}
