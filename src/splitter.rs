//! Splitting one normalized document into its individual works.
//!
//! Uploaded manuscripts routinely bundle many works in one document,
//! delimited by a magic marker line. The marker token is a compatibility
//! contract with previously authored source documents and must not change.

use lazy_static::lazy_static;
use regex::Regex;

/// Work-separator marker: a new work starts at a line beginning with this
/// token. The token is part of the authored-document contract.
pub const WORK_SEPARATOR: &str = "&&& ";

lazy_static! {
    /// Work-separator token at line start
    static ref RE_SEPARATOR_PREFIX: Regex = Regex::new(r"(?m)^&&& ").unwrap();
}

/// One work extracted from the merged document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Work {
    /// First line of the chunk, trimmed.
    pub title: String,
    /// Remaining lines of the chunk, each trimmed, joined by newline.
    pub content: String,
}

/// Whether the document bundles more than one work.
///
/// Detection is solely by the presence of the separator marker; this is also
/// the gate for footnote relocation.
pub fn has_multiple_works(markup: &str) -> bool {
    RE_SEPARATOR_PREFIX.is_match(markup)
}

/// Split a normalized document into its ordered list of works.
///
/// Text before the first separator belongs to no work and is dropped when
/// blank; chunks whose title trims to nothing are skipped. A document with
/// no separator at all yields a single implicit work covering the whole
/// document.
///
/// # Examples
///
/// ```
/// use manuscript_ingest::splitter::split_works;
///
/// let works = split_works("&&& A\nbody A\n&&& B\nbody B");
/// assert_eq!(works.len(), 2);
/// assert_eq!(works[0].title, "A");
/// assert_eq!(works[0].content, "body A");
/// ```
pub fn split_works(markup: &str) -> Vec<Work> {
    let mut works = Vec::new();
    for chunk in RE_SEPARATOR_PREFIX.split(markup) {
        if chunk.trim().is_empty() {
            continue;
        }
        let mut lines = chunk.lines();
        let title = match lines.next() {
            Some(first) => first.trim().to_string(),
            None => continue,
        };
        if title.is_empty() {
            continue;
        }
        let content = lines.map(str::trim).collect::<Vec<_>>().join("\n");
        works.push(Work { title, content });
    }
    works
}
