//! Raw-text cleanup: the first two pipeline stages.
//!
//! Both stages are pure per-document string transforms:
//! 1. [`strip_equations`] removes inline LaTeX math (`$...$`).
//! 2. [`normalize_whitespace`] collapses whitespace runs to one space.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default inline-math delimiter in arXiv abstracts.
pub const DEFAULT_EQUATION_DELIMITER: char = '$';

// ─────────────────────────────────────────────────────────────────────────────
// Equation stripping
// ─────────────────────────────────────────────────────────────────────────────

/// Remove every delimited equation span, delimiters included.
///
/// Delimiters are paired consecutively (1st with 2nd, 3rd with 4th, ...).
/// With an odd number of delimiters the pairing is ambiguous and the document
/// is returned unchanged.  `$$a$$` is treated as two empty pairs around `a`,
/// so only the delimiters disappear.
pub fn strip_equations(doc: &str, delimiter: char) -> String {
    let positions: Vec<usize> = doc.match_indices(delimiter).map(|(i, _)| i).collect();
    if positions.len() % 2 != 0 {
        return doc.to_string();
    }

    let width = delimiter.len_utf8();
    let mut out = String::with_capacity(doc.len());
    let mut cursor = 0;
    for pair in positions.chunks_exact(2) {
        out.push_str(&doc[cursor..pair[0]]);
        cursor = pair[1] + width;
    }
    out.push_str(&doc[cursor..]);
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Whitespace
// ─────────────────────────────────────────────────────────────────────────────

static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Replace every run of whitespace (spaces, tabs, newlines) with one space.
///
/// Leading and trailing runs are collapsed too, not trimmed.
pub fn normalize_whitespace(doc: &str) -> String {
    RE_SPACES.replace_all(doc, " ").into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
