//! Relocation of footnote definitions to the works that reference them.
//!
//! The external converter collects every footnote definition into a single
//! block trailing the last work, even when earlier works own the references.
//! This module re-splits the document with its separator lines intact, maps
//! each section's body under a collision-safe key, and moves every located
//! definition span into the section that references it. Definitions nobody
//! claims stay where the converter left them.

use crate::splitter::WORK_SEPARATOR;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A whole work-separator line, marker included
    static ref RE_SEPARATOR_LINE: Regex = Regex::new(r"(?m)^&&& [^\n]*").unwrap();

    /// A complete bracketed footnote token, e.g. `[^12]`
    static ref RE_FOOTNOTE_TOKEN: Regex = Regex::new(r"\[\^\d+\]").unwrap();

    /// A footnote reference: a token not followed by a colon
    static ref RE_FOOTNOTE_REF: Regex = Regex::new(r"(\[\^\d+\])[^:]").unwrap();

    /// Any footnote marker at all; presence gates relocation
    static ref RE_FOOTNOTE_ANY: Regex = Regex::new(r"\[\^\d+\]").unwrap();
}

/// Key addressing one section of the document.
///
/// Two works may share a title within one manuscript, so the key carries the
/// 1-based occurrence ordinal of its separator line as a disambiguator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionKey {
    /// Section title, with any embedded footnote tokens removed.
    pub title: String,
    /// 1-based ordinal of the separator line that opened the section.
    pub occurrence: usize,
}

/// Whether the document contains any footnote marker.
pub fn has_footnote_markers(markup: &str) -> bool {
    RE_FOOTNOTE_ANY.is_match(markup)
}

/// Move trailing footnote definitions into the sections referencing them.
///
/// Returns the sections in document order, each mapped to its corrected body
/// text. Every definition span claimed by an earlier section is removed from
/// the final section's trailing block and appended, newline-prefixed, to the
/// claiming section. When two sections reference the same footnote number the
/// first one claims the definition and later ones find nothing; this
/// mirrors the behavior of documents already ingested and is covered by
/// tests rather than changed.
///
/// # Examples
///
/// ```
/// use manuscript_ingest::footnotes::relocate_footnotes;
///
/// let doc = "&&& One\nuses[^1] a note\n&&& Two\nbody\n[^1]: the note\n";
/// let sections = relocate_footnotes(doc);
/// let bodies: Vec<&String> = sections.values().collect();
/// assert!(bodies[0].contains("[^1]: the note"));
/// assert!(!bodies[1].contains("[^1]: the note"));
/// ```
pub fn relocate_footnotes(markup: &str) -> IndexMap<SectionKey, String> {
    let mut sections = collect_sections(markup);
    if sections.len() < 2 {
        return sections;
    }

    let keys: Vec<SectionKey> = sections.keys().cloned().collect();
    let (last_key, earlier) = keys.split_last().expect("len checked above");

    let mut unresolved = 0usize;
    for key in earlier {
        let refs = referenced_tokens(&sections[key]);
        let mut claimed = String::new();
        for token in &refs {
            match claim_definition(sections.get_mut(last_key).expect("last key present"), token) {
                Some(span) => claimed.push_str(&span),
                None => unresolved += 1,
            }
        }
        let body = sections.get_mut(key).expect("key present");
        body.push('\n');
        body.push_str(&claimed);
    }
    if unresolved > 0 {
        log::debug!("{} footnote reference(s) had no locatable definition", unresolved);
    }
    sections
}

/// Re-split the document keeping separator lines, mapping each section body
/// under its disambiguated key. Footnote tokens embedded in a title line are
/// stripped from the title and carried into that section's body instead.
fn collect_sections(markup: &str) -> IndexMap<SectionKey, String> {
    let mut sections = IndexMap::new();
    let mut pending: Option<SectionKey> = None;
    let mut carry = String::new();
    let mut occurrence = 0usize;
    let mut last_end = 0usize;

    for m in RE_SEPARATOR_LINE.find_iter(markup) {
        // Text before the first separator belongs to no section.
        if let Some(key) = pending.take() {
            let chunk = &markup[last_end..m.start()];
            sections.insert(key, format!("{}{}", carry, chunk));
            carry.clear();
        }
        occurrence += 1;
        let raw_title = m.as_str()[WORK_SEPARATOR.len()..].trim();
        let (title, tokens) = strip_title_tokens(raw_title);
        carry.push_str(&tokens);
        pending = Some(SectionKey { title, occurrence });
        last_end = m.end();
    }

    if let Some(key) = pending {
        let chunk = &markup[last_end..];
        sections.insert(key, format!("{}{}", carry, chunk));
    }
    sections
}

/// Remove every footnote token from a title line, returning the cleaned
/// title and the concatenated tokens.
fn strip_title_tokens(raw_title: &str) -> (String, String) {
    let mut title = raw_title.to_string();
    let mut tokens = String::new();
    while let Some(m) = RE_FOOTNOTE_TOKEN.find(&title) {
        tokens.push_str(m.as_str());
        let range = m.range();
        title.replace_range(range, "");
        title = title.trim().to_string();
    }
    (title, tokens)
}

/// Footnote tokens referenced (not defined) in a section body, in order.
fn referenced_tokens(body: &str) -> Vec<String> {
    RE_FOOTNOTE_REF
        .captures_iter(body)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Cut the definition span for `token` out of the trailing block.
///
/// The span runs from `<token>:` up to (not including) the next footnote
/// marker, or to end-of-text when the definition is the last one.
fn claim_definition(trailing: &mut String, token: &str) -> Option<String> {
    let quoted = regex::escape(token);
    let bounded = Regex::new(&format!(r"(?s)({}:.*?)\[\^\d+\]", quoted)).ok()?;
    let open_ended = Regex::new(&format!(r"(?s)({}:.*)", quoted)).ok()?;

    let span = bounded
        .captures(trailing)
        .or_else(|| open_ended.captures(trailing))
        .map(|cap| cap[1].to_string())?;
    let remainder = trailing.replacen(&span, "", 1);
    *trailing = remainder;
    Some(span)
}
