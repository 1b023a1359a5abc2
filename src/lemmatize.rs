//! Lemmatisation with part-of-speech filtering.

use std::collections::BTreeSet;

use crate::{
    analyze::{Analyzer, PosTag},
    batch,
    error::{PreprocessError, Result},
};

/// Tags kept by default: nouns, adjectives and proper nouns.
pub const DEFAULT_POS_TAGS: [PosTag; 3] = [PosTag::Noun, PosTag::Adj, PosTag::Propn];

/// Immutable set of part-of-speech tags whose lemmas survive the last stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosFilter {
    tags: BTreeSet<PosTag>,
}

impl Default for PosFilter {
    fn default() -> Self {
        DEFAULT_POS_TAGS.into_iter().collect()
    }
}

impl FromIterator<PosTag> for PosFilter {
    fn from_iter<I: IntoIterator<Item = PosTag>>(iter: I) -> Self {
        Self { tags: iter.into_iter().collect() }
    }
}

impl PosFilter {
    /// Parse tag names case-insensitively (`"noun"`, `"PROPN"`).
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        names.iter().map(|n| n.as_ref().parse::<PosTag>()).collect()
    }

    pub fn allows(&self, tag: PosTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = PosTag> + '_ {
        self.tags.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Lemmas of the tokens in `tokens` whose tag passes `filter`, in order.
///
/// The tokens are joined with single spaces and analysed as one text.  An
/// empty document never reaches the analyzer.
pub fn lemmatize_document<A: Analyzer + ?Sized>(
    analyzer: &A,
    tokens: &[String],
    filter: &PosFilter,
) -> anyhow::Result<Vec<String>> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let text = tokens.join(" ");
    Ok(analyzer
        .analyze(&text)?
        .into_iter()
        .filter(|t| filter.allows(t.pos))
        .map(|t| t.lemma)
        .collect())
}

/// [`lemmatize_document`] over a batch.  The first failing document (by
/// position) fails the whole batch.
pub fn lemmatize_batch<A: Analyzer + ?Sized>(
    analyzer: &A,
    corpus: &[Vec<String>],
    filter: &PosFilter,
) -> Result<Vec<Vec<String>>> {
    batch::try_map_indexed(corpus, |index, tokens| {
        lemmatize_document(analyzer, tokens, filter).map_err(|e| PreprocessError::Analysis {
            index,
            message: format!("{e:#}"),
        })
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyze::AnalyzedToken, english::EnglishAnalyzer};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    /// Counts calls and fails on any text containing "boom".
    #[derive(Default)]
    struct Probe {
        calls: AtomicUsize,
    }

    impl Analyzer for Probe {
        fn analyze(&self, text: &str) -> anyhow::Result<Vec<AnalyzedToken>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("boom") {
                anyhow::bail!("tagger crashed");
            }
            Ok(text
                .split_whitespace()
                .map(|w| AnalyzedToken::new(w, w.to_uppercase(), PosTag::Noun))
                .collect())
        }
    }

    #[test]
    fn test_default_filter() {
        let f = PosFilter::default();
        assert!(f.allows(PosTag::Noun));
        assert!(f.allows(PosTag::Adj));
        assert!(f.allows(PosTag::Propn));
        assert!(!f.allows(PosTag::Verb));
        assert_eq!(f.tags().count(), 3);
    }

    #[test]
    fn test_from_names() {
        let f = PosFilter::from_names(&["noun", "VERB"]).unwrap();
        assert!(f.allows(PosTag::Verb));
        assert!(!f.allows(PosTag::Adj));
        assert!(PosFilter::from_names(&["NN"]).is_err());
    }

    #[test]
    fn test_filters_and_lemmatises() {
        let a = EnglishAnalyzer::new();
        let out = lemmatize_document(
            &a,
            &toks(&["deep_learning", "models", "proposed", "great", "quickly"]),
            &PosFilter::default(),
        )
        .unwrap();
        assert_eq!(out, toks(&["deep_learning", "model", "great"]));
    }

    #[test]
    fn test_empty_document_skips_analyzer() {
        let probe = Probe::default();
        let out = lemmatize_document(&probe, &[], &PosFilter::default()).unwrap();
        assert!(out.is_empty());
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_filter_drops_everything() {
        let filter: PosFilter = std::iter::empty().collect();
        assert!(filter.is_empty());
        let out = lemmatize_document(&Probe::default(), &toks(&["alpha"]), &filter).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_batch_preserves_order_and_count() {
        let corpus = vec![toks(&["alpha", "beta"]), vec![], toks(&["gamma"])];
        let out = lemmatize_batch(&Probe::default(), &corpus, &PosFilter::default()).unwrap();
        assert_eq!(out, vec![toks(&["ALPHA", "BETA"]), vec![], toks(&["GAMMA"])]);
    }

    #[test]
    fn test_batch_failure_reports_index() {
        let corpus = vec![toks(&["fine"]), toks(&["boom"]), toks(&["also", "boom"])];
        let err = lemmatize_batch(&Probe::default(), &corpus, &PosFilter::default()).unwrap_err();
        match err {
            PreprocessError::Analysis { index, message } => {
                assert_eq!(index, 1);
                assert!(message.contains("tagger crashed"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
