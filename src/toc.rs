//! Table-of-contents codec.
//!
//! One metadata record per work, one record per line, six `||`-delimited
//! fields: inclusion flag, title, contributor list as embedded JSON, genre
//! code, language code, rights-status code. This flat format is the only
//! persisted textual contract of the pipeline (it is what human reviewers
//! edit between splitting and finalization) and must stay byte-stable so
//! previously stored sessions remain loadable.

use crate::error::{Error, Result};

/// Field delimiter within a record. Multi-character so that embedded
/// contributor JSON cannot collide with it.
pub const TOC_DELIMITER: &str = "||";

/// Whether a work is ingested or merely recorded as a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// The work is uploaded into the catalogue (`yes`).
    Include,
    /// The work is listed but not uploaded (`no`).
    Placeholder,
}

impl Inclusion {
    /// Wire value of the flag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Inclusion::Include => "yes",
            Inclusion::Placeholder => "no",
        }
    }
}

/// One table-of-contents record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Inclusion flag.
    pub include: Inclusion,
    /// Work title; may carry escape sequences for literal brackets or
    /// asterisks, which travel through the codec untouched.
    pub title: String,
    /// Work-specific contributor list as embedded JSON, or empty to fall
    /// back to the session defaults.
    pub contributors: String,
    /// Genre code.
    pub genre: String,
    /// Language code.
    pub language: String,
    /// Rights-status code; empty when not yet determined.
    pub rights: String,
}

/// Encode records into the flat line-oriented format.
///
/// # Examples
///
/// ```
/// use manuscript_ingest::toc::{encode_toc, Inclusion, TocEntry};
///
/// let entry = TocEntry {
///     include: Inclusion::Include,
///     title: "Work 1".to_string(),
///     contributors: String::new(),
///     genre: "prose".to_string(),
///     language: "he".to_string(),
///     rights: "public_domain".to_string(),
/// };
/// assert_eq!(encode_toc(&[entry]), "yes||Work 1||||prose||he||public_domain");
/// ```
pub fn encode_toc(entries: &[TocEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            [
                e.include.as_str(),
                e.title.as_str(),
                e.contributors.as_str(),
                e.genre.as_str(),
                e.language.as_str(),
                e.rights.as_str(),
            ]
            .join(TOC_DELIMITER)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode a table-of-contents buffer.
///
/// Blank lines are skipped; every other line must split into exactly six
/// fields, each trimmed. Round-trip contract:
/// `decode_toc(&encode_toc(&entries))? == entries` for well-formed entries.
pub fn decode_toc(buffer: &str) -> Result<Vec<TocEntry>> {
    let mut entries = Vec::new();
    for (idx, raw_line) in buffer.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(TOC_DELIMITER).map(str::trim).collect();
        if fields.len() != 6 {
            return Err(Error::Toc {
                line: idx + 1,
                reason: format!("expected 6 fields, found {}", fields.len()),
            });
        }
        let include = match fields[0] {
            "yes" => Inclusion::Include,
            "no" => Inclusion::Placeholder,
            other => {
                return Err(Error::Toc {
                    line: idx + 1,
                    reason: format!("unknown inclusion flag '{}'", other),
                })
            },
        };
        entries.push(TocEntry {
            include,
            title: fields[1].to_string(),
            contributors: fields[2].to_string(),
            genre: fields[3].to_string(),
            language: fields[4].to_string(),
            rights: fields[5].to_string(),
        });
    }
    Ok(entries)
}

/// Records flagged for upload.
pub fn included(entries: &[TocEntry]) -> Vec<&TocEntry> {
    entries
        .iter()
        .filter(|e| e.include == Inclusion::Include)
        .collect()
}

/// Records kept as placeholders only.
pub fn placeholders(entries: &[TocEntry]) -> Vec<&TocEntry> {
    entries
        .iter()
        .filter(|e| e.include == Inclusion::Placeholder)
        .collect()
}
