//! Word tokeniser for normalised abstracts.
//!
//! Lowercases, optionally strips accents, then keeps maximal runs of word
//! characters that are not digits.  `x2` therefore yields `x`, `3d` yields `d`
//! and pure numbers vanish.  Tokens outside the configured character-length
//! window, or starting with `_`, are dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Shortest token kept by default.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// Longest token kept by default.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 15;

/// Word characters minus digits.  Underscores are word characters, so
/// `foo_bar` survives as one token.
static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\W\d]+").unwrap());

/// Strip accents: NFD, drop combining marks, recompose.
pub fn deaccent(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Tokeniser settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    pub min_len: usize,
    pub max_len: usize,
    pub deaccent: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_MIN_TOKEN_LEN,
            max_len: DEFAULT_MAX_TOKEN_LEN,
            deaccent: false,
        }
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn with_deaccent(mut self, deaccent: bool) -> Self {
        self.deaccent = deaccent;
        self
    }

    /// Split one document into lowercase tokens, preserving order.
    pub fn tokenize(&self, doc: &str) -> Vec<String> {
        let lowered = if self.deaccent {
            deaccent(doc).to_lowercase()
        } else {
            doc.to_lowercase()
        };

        RE_WORD
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|tok| self.keeps(tok))
            .map(str::to_string)
            .collect()
    }

    fn keeps(&self, token: &str) -> bool {
        let len = token.chars().count();
        len >= self.min_len && len <= self.max_len && !token.starts_with('_')
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenize() {
        let toks = Tokenizer::new().tokenize("Deep Learning is great.");
        assert_eq!(toks, vec!["deep", "learning", "great"]);
    }

    #[test]
    fn test_drops_numbers_and_punctuation() {
        let toks = Tokenizer::new().tokenize("We trained 1200 models, (99.5%) accurate!");
        assert_eq!(toks, vec!["trained", "models", "accurate"]);
    }

    #[test]
    fn test_digits_split_words() {
        let toks = Tokenizer::new().with_min_len(1).tokenize("abc123def");
        assert_eq!(toks, vec!["abc", "def"]);
    }

    #[test]
    fn test_length_window() {
        let toks = Tokenizer::new().tokenize("an ox ate supercalifragilistic hay");
        assert_eq!(toks, vec!["ate", "hay"]);

        let toks = Tokenizer::new().with_min_len(2).tokenize("an ox");
        assert_eq!(toks, vec!["an", "ox"]);
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // "été" is 3 chars but 5 bytes.
        let toks = Tokenizer::new().with_max_len(3).tokenize("été");
        assert_eq!(toks, vec!["été"]);
    }

    #[test]
    fn test_underscore_rules() {
        let toks = Tokenizer::new().tokenize("_private snake_case");
        assert_eq!(toks, vec!["snake_case"]);
    }

    #[test]
    fn test_deaccent() {
        assert_eq!(deaccent("naïve café"), "naive cafe");
        let toks = Tokenizer::new().with_deaccent(true).tokenize("Schrödinger équation");
        assert_eq!(toks, vec!["schrodinger", "equation"]);
    }

    #[test]
    fn test_empty_documents() {
        assert!(Tokenizer::new().tokenize("").is_empty());
        assert!(Tokenizer::new().tokenize("   \t ").is_empty());
    }
}
