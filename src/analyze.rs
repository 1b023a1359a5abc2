//! Linguistic analysis seam: part-of-speech tags and lemmas.
//!
//! The lemmatisation stage only needs `analyze(text) -> [(lemma, pos)]`.
//! Anything implementing [`Analyzer`] can be plugged into the pipeline: the
//! bundled rule-based [`EnglishAnalyzer`](crate::english::EnglishAnalyzer), a
//! wrapper around an external tagger, or a fixed table in tests.
//!
//! Analyzers see the phrase-merged token stream joined by spaces.  A
//! third-party tagger may split `neural_network` at the underscore; the
//! bundled analyzer keeps phrase tokens whole.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::PreprocessError;

// ─────────────────────────────────────────────────────────────────────────────
// Part-of-speech tags
// ─────────────────────────────────────────────────────────────────────────────

/// Universal Dependencies coarse part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl PosTag {
    pub const ALL: [PosTag; 17] = [
        PosTag::Adj,
        PosTag::Adp,
        PosTag::Adv,
        PosTag::Aux,
        PosTag::Cconj,
        PosTag::Det,
        PosTag::Intj,
        PosTag::Noun,
        PosTag::Num,
        PosTag::Part,
        PosTag::Pron,
        PosTag::Propn,
        PosTag::Punct,
        PosTag::Sconj,
        PosTag::Sym,
        PosTag::Verb,
        PosTag::X,
    ];

    /// The tag's canonical upper-case name, e.g. `"PROPN"`.
    pub fn as_str(self) -> &'static str {
        match self {
            PosTag::Adj => "ADJ",
            PosTag::Adp => "ADP",
            PosTag::Adv => "ADV",
            PosTag::Aux => "AUX",
            PosTag::Cconj => "CCONJ",
            PosTag::Det => "DET",
            PosTag::Intj => "INTJ",
            PosTag::Noun => "NOUN",
            PosTag::Num => "NUM",
            PosTag::Part => "PART",
            PosTag::Pron => "PRON",
            PosTag::Propn => "PROPN",
            PosTag::Punct => "PUNCT",
            PosTag::Sconj => "SCONJ",
            PosTag::Sym => "SYM",
            PosTag::Verb => "VERB",
            PosTag::X => "X",
        }
    }

    pub fn is_noun(self) -> bool {
        matches!(self, PosTag::Noun | PosTag::Propn)
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PosTag {
    type Err = PreprocessError;

    /// Case-insensitive; `"noun"`, `"NOUN"` and `"Noun"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PosTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PreprocessError::InvalidConfig(format!("unknown POS tag {s:?}")))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Analyzer interface
// ─────────────────────────────────────────────────────────────────────────────

/// One word-level unit produced by an analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedToken {
    /// Surface form as it appeared in the analysed text.
    pub text: String,
    /// Dictionary form.
    pub lemma: String,
    pub pos: PosTag,
}

impl AnalyzedToken {
    pub fn new(text: impl Into<String>, lemma: impl Into<String>, pos: PosTag) -> Self {
        Self { text: text.into(), lemma: lemma.into(), pos }
    }
}

/// A part-of-speech tagger and lemmatiser.
///
/// Implementations must be shareable across threads: a fitted pipeline keeps
/// one analyzer behind an `Arc` and may call it from rayon workers.
pub trait Analyzer: Send + Sync {
    /// Tag and lemmatise whitespace-separated `text`, in order.
    fn analyze(&self, text: &str) -> anyhow::Result<Vec<AnalyzedToken>>;

    /// Short name for log messages.
    fn name(&self) -> &str {
        "analyzer"
    }
}

impl<A: Analyzer + ?Sized> Analyzer for std::sync::Arc<A> {
    fn analyze(&self, text: &str) -> anyhow::Result<Vec<AnalyzedToken>> {
        (**self).analyze(text)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
