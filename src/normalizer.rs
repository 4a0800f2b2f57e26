//! Line classifier and normalizer for converted manuscript markup.
//!
//! The external converter emits generic markup with inline wrapper tags and
//! no awareness of Hebrew typography. This module turns that output into the
//! restricted target dialect in one deterministic, line-oriented pass:
//!
//! - wrapper tags are stripped (line-break tags survive)
//! - fully vocalized lines are put in blockquotes, poetry-style
//! - blank lines inside a vocalized run keep the blockquote open
//! - asterisk-only and en-dash-only lines become horizontal rules
//! - multi-line footnote bodies are tab-indented under their definition
//!
//! followed by a global cleanup that collapses blank runs, fixes spacing
//! before punctuation, and expands stanza-break placeholders.
//!
//! Running the normalizer on its own output changes nothing.

use crate::hebrew::Vocalization;
use crate::stanza::{STANZA_BREAK, STANZA_BREAK_ESCAPED, STANZA_EXPANSION};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    /// Inline wrapper tags left by the converter; `<br>` variants and bare
    /// `<` characters are untouched
    static ref RE_WRAPPER_TAG: Regex =
        Regex::new(r"(?i)</?(?:span|div|p|a|strong|em|b|i)(?:\s[^>]*)?>").unwrap();

    /// Footnote definition start: `[^N]:` at line start
    static ref RE_FOOTNOTE_DEF: Regex = Regex::new(r"^\[\^\d+\]:").unwrap();

    /// Any footnote marker, reference or definition
    static ref RE_FOOTNOTE_MARK: Regex = Regex::new(r"\[\^\d+").unwrap();

    /// Markdown heading, levels 1-6
    static ref RE_HEADING: Regex = Regex::new(r"^#{1,6}\s").unwrap();

    /// Work-separator line
    static ref RE_SEPARATOR: Regex = Regex::new(r"^&&&\s").unwrap();

    /// Already-quoted line, possibly indented
    static ref RE_QUOTED: Regex = Regex::new(r"^\s*>").unwrap();

    /// Runs of three or more newlines; intervening blank lines may carry
    /// spaces, tabs, or NBSP
    static ref RE_BLANK_RUN: Regex =
        Regex::new(r"\n[ \t\u{00a0}]*\n(?:[ \t\u{00a0}]*\n)+").unwrap();

    /// Newline runs around an expanded stanza break
    static ref RE_STANZA_RUN: Regex =
        Regex::new(r"(?:\n\s*)*\n> \n<br />\n> (?:\n\s*)*").unwrap();

    /// Over-nested quote markers at line start
    static ref RE_OVERNESTED_QUOTE: Regex = Regex::new(r"\n> *> +").unwrap();

    /// Blank line before an empty-quote line that opens a verse
    static ref RE_GAP_BEFORE_VERSE: Regex = Regex::new(r"\n\s*\n> *\n> ").unwrap();
}

/// Sentence punctuation that must not be preceded by a space.
const SENTENCE_PUNCTUATION: [char; 6] = ['.', ',', ':', ';', '?', '!'];

/// Carried state of the line pass.
#[derive(Debug, Clone, Copy, Default)]
struct LineState {
    /// A footnote definition has been seen; non-definition lines from here
    /// on are continuations of the preceding footnote.
    in_footnotes: bool,
    /// The previous non-blank line was fully vocalized, so a blank line is a
    /// stanza gap that must keep the blockquote open.
    prev_vocalized: bool,
}

/// Normalizes converter output into the target markup dialect.
///
/// The vocalization predicate is injected so the deterministic pipeline can
/// be exercised without a real classifier.
///
/// # Examples
///
/// ```
/// use manuscript_ingest::hebrew::DensityVocalization;
/// use manuscript_ingest::normalizer::Normalizer;
///
/// let classifier = DensityVocalization::new();
/// let normalizer = Normalizer::new(&classifier);
///
/// let output = normalizer.normalize("<span dir=\"rtl\">שִׁיר הַשִּׁירִים</span>");
/// assert_eq!(output, "> שִׁיר הַשִּׁירִים");
/// ```
pub struct Normalizer<'a> {
    vocalization: &'a dyn Vocalization,
}

impl<'a> Normalizer<'a> {
    /// Create a normalizer around a vocalization classifier.
    pub fn new(vocalization: &'a dyn Vocalization) -> Self {
        Self { vocalization }
    }

    /// Normalize a whole converted document.
    ///
    /// Deterministic and idempotent: `normalize(normalize(x)) == normalize(x)`.
    pub fn normalize(&self, raw: &str) -> String {
        let stripped = strip_wrapper_tags(raw);
        let mut lines: Vec<String> = stripped.split('\n').map(str::to_string).collect();
        let mut state = LineState::default();
        for line in &mut lines {
            self.classify_line(line, &mut state);
        }
        cleanup(&lines.join("\n"))
    }

    fn classify_line(&self, line: &mut String, state: &mut LineState) {
        let trimmed = line.trim().to_string();
        // `>` is the trimmed form of an empty quoted line; keep the canonical
        // trailing space so repeated runs are byte-stable.
        *line = if trimmed == ">" {
            "> ".to_string()
        } else {
            trimmed
        };

        if line.is_empty() && state.prev_vocalized {
            // Stanza gap inside a quoted block; carried state stays as-is.
            *line = "> ".to_string();
            return;
        }

        if is_rule_line(line) {
            *line = "***".to_string();
            state.prev_vocalized = false;
            return;
        }

        if RE_FOOTNOTE_DEF.is_match(line) {
            state.in_footnotes = true;
        }

        if self.vocalization.is_fully_vocalized(line) {
            if !RE_FOOTNOTE_MARK.is_match(line)
                && !is_heading_line(line)
                && !RE_QUOTED.is_match(line)
            {
                let quoted = format!("> {}", line);
                *line = quoted;
            }
            state.prev_vocalized = true;
        } else {
            state.prev_vocalized = false;
        }

        if state.in_footnotes && !RE_FOOTNOTE_DEF.is_match(line) {
            let continued = format!("\t{}", line);
            *line = continued;
        }
    }
}

/// Remove the converter's inline wrapper tags from `text`.
///
/// Strips `span`, `div`, `p`, `a`, `strong`, `em`, `b`, and `i` tags (open
/// and close, with or without attributes). Line-break tags and `<` characters
/// that do not open a tag are preserved.
pub fn strip_wrapper_tags(text: &str) -> String {
    RE_WRAPPER_TAG.replace_all(text, "").to_string()
}

/// Heading (1–6 `#` plus whitespace) or work-separator line.
///
/// Such lines are exempt from blockquote prefixing even when vocalized.
pub fn is_heading_line(line: &str) -> bool {
    RE_HEADING.is_match(line) || RE_SEPARATOR.is_match(line)
}

/// A line whose only non-whitespace characters are all asterisks or all
/// en-dashes; rendered as a horizontal rule.
fn is_rule_line(line: &str) -> bool {
    let uniq: HashSet<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    uniq.len() == 1 && (uniq.contains(&'*') || uniq.contains(&'\u{2013}'))
}

/// Whole-buffer cleanup applied after the line pass.
fn cleanup(text: &str) -> String {
    let mut buf = RE_BLANK_RUN.replace_all(text, "\n\n").to_string();

    for c in SENTENCE_PUNCTUATION {
        buf = buf.replace(&format!(" {}", c), &c.to_string());
    }

    buf = buf.replace(STANZA_BREAK, STANZA_EXPANSION);
    buf = buf.replace(STANZA_BREAK_ESCAPED, STANZA_EXPANSION);
    buf = RE_STANZA_RUN
        .replace_all(&buf, "\n> \n<br />\n> \n\n")
        .to_string();
    buf = RE_OVERNESTED_QUOTE.replace_all(&buf, "\n> ").to_string();
    buf = RE_GAP_BEFORE_VERSE.replace_all(&buf, "\n> \n> ").to_string();
    // The quote marker confuses downstream markup processing of line breaks.
    buf.replace("> <br />", "<br />")
}
