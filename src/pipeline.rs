//! The six-stage preprocessing pipeline.
//!
//! Fitting produces an immutable [`FittedPreprocessor`] holding everything
//! `transform` needs: the stopword set, the learned phrase model, the POS
//! filter and a shared analyzer handle.  [`Preprocessor`] wraps it in the
//! familiar `fit_transform` / `transform` facade.

use std::{fmt, sync::Arc};

use log::Level;

use crate::{
    analyze::Analyzer,
    batch,
    config::PreprocessorConfig,
    error::{PreprocessError, Result},
    lemmatize::{lemmatize_batch, PosFilter},
    phrases::{PhraseDetector, PhraseModel},
    preprocess::{normalize_whitespace, strip_equations},
    stopwords::StopwordSet,
    tokenize::Tokenizer,
};

const STAGES: usize = 6;

fn stage(level: Level, k: usize, what: &str) {
    log::log!(level, " [{k}/{STAGES}] {what}...");
}

// ─────────────────────────────────────────────────────────────────────────────
// Stages 1-3
// ─────────────────────────────────────────────────────────────────────────────

fn clean_and_tokenize<S: AsRef<str> + Sync>(
    docs: &[S],
    config: &PreprocessorConfig,
    tokenizer: &Tokenizer,
    level: Level,
) -> Vec<Vec<String>> {
    stage(level, 1, "Removing equations");
    let stripped = batch::map(docs, |d| strip_equations(d.as_ref(), config.equation_delimiter));

    stage(level, 2, "Normalizing whitespace");
    let normalized = batch::map(&stripped, |d| normalize_whitespace(d));

    stage(level, 3, "Tokenizing");
    batch::map(&normalized, |d| tokenizer.tokenize(d))
}

// ─────────────────────────────────────────────────────────────────────────────
// FittedPreprocessor
// ─────────────────────────────────────────────────────────────────────────────

/// A fitted pipeline.  Cheap to clone; safe to share across threads.
#[derive(Clone)]
pub struct FittedPreprocessor {
    config: PreprocessorConfig,
    tokenizer: Tokenizer,
    stopwords: StopwordSet,
    phrases: PhraseModel,
    pos_filter: PosFilter,
    analyzer: Arc<dyn Analyzer>,
}

impl fmt::Debug for FittedPreprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FittedPreprocessor")
            .field("config", &self.config)
            .field("stopwords", &self.stopwords.len())
            .field("phrases", &self.phrases.phrase_count())
            .field("pos_filter", &self.pos_filter)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl FittedPreprocessor {
    /// Run all six stages on `docs` with the learned phrase model.
    ///
    /// Output has one token list per input document, in input order.
    pub fn transform<S: AsRef<str> + Sync>(&self, docs: &[S]) -> Result<Vec<Vec<String>>> {
        let level = Level::Debug;
        let tokens = clean_and_tokenize(docs, &self.config, &self.tokenizer, level);

        stage(level, 4, "Removing stopwords");
        let filtered = batch::map(&tokens, |t| self.stopwords.filter(t));

        stage(level, 5, "Applying phrases");
        let merged = self.phrases.apply(&filtered);

        stage(level, 6, "Lemmatizing");
        lemmatize_batch(self.analyzer.as_ref(), &merged, &self.pos_filter)
    }

    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    pub fn phrase_model(&self) -> &PhraseModel {
        &self.phrases
    }

    pub fn pos_filter(&self) -> &PosFilter {
        &self.pos_filter
    }

    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preprocessor
// ─────────────────────────────────────────────────────────────────────────────

/// Stateful pipeline facade.
///
/// # Example
/// ```
/// use arxiv_preprocess::{Preprocessor, PreprocessorConfig};
///
/// let config = PreprocessorConfig { min_count: 1, n_gram_threshold: 1.0, ..Default::default() };
/// let mut pre = Preprocessor::new(config).unwrap();
/// let out = pre
///     .fit_transform(&["Deep learning models are great.", "Deep learning is powerful."])
///     .unwrap();
/// assert_eq!(out[1], vec!["deep_learning", "powerful"]);
/// ```
pub struct Preprocessor {
    config: PreprocessorConfig,
    analyzer: Arc<dyn Analyzer>,
    fitted: Option<FittedPreprocessor>,
}

impl fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preprocessor")
            .field("config", &self.config)
            .field("analyzer", &self.analyzer.name())
            .field("fitted", &self.fitted.is_some())
            .finish()
    }
}

impl Preprocessor {
    /// Validate `config` and build the bundled English analyzer for it.
    pub fn new(config: PreprocessorConfig) -> Result<Self> {
        config.validate()?;
        let analyzer = config.english_analyzer()?;
        Ok(Self { config, analyzer: Arc::new(analyzer), fitted: None })
    }

    /// Use a caller-supplied analyzer instead of the bundled one.
    pub fn with_analyzer(config: PreprocessorConfig, analyzer: Arc<dyn Analyzer>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, analyzer, fitted: None })
    }

    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The state learned by the last successful `fit_transform`.
    pub fn fitted(&self) -> Result<&FittedPreprocessor> {
        self.fitted.as_ref().ok_or(PreprocessError::NotFitted)
    }

    /// Learn stopwords and phrases from `docs` without touching `self`.
    ///
    /// Returns the fitted pipeline together with the processed corpus.
    pub fn fit<S: AsRef<str> + Sync>(
        &self,
        docs: &[S],
    ) -> Result<(FittedPreprocessor, Vec<Vec<String>>)> {
        let level = Level::Info;
        log::info!("Fitting on {} documents", docs.len());

        let tokenizer = self.config.tokenizer();
        let tokens = clean_and_tokenize(docs, &self.config, &tokenizer, level);

        stage(level, 4, "Removing stopwords");
        let stopwords = self.config.stopwords();
        let filtered = batch::map(&tokens, |t| stopwords.filter(t));

        stage(level, 5, "Detecting phrases");
        let detector = PhraseDetector::new(self.config.phrase_config());
        let (phrases, merged) = detector.fit(filtered);

        stage(level, 6, "Lemmatizing");
        let pos_filter = self.config.pos_filter()?;
        let output = lemmatize_batch(self.analyzer.as_ref(), &merged, &pos_filter)?;
        log::info!(" Done.");

        let fitted = FittedPreprocessor {
            config: self.config.clone(),
            tokenizer,
            stopwords,
            phrases,
            pos_filter,
            analyzer: Arc::clone(&self.analyzer),
        };
        Ok((fitted, output))
    }

    /// Fit on `docs` and return their processed form.
    ///
    /// Replaces any previous fitted state.  On error the previous state is
    /// kept.
    pub fn fit_transform<S: AsRef<str> + Sync>(&mut self, docs: &[S]) -> Result<Vec<Vec<String>>> {
        let (fitted, output) = self.fit(docs)?;
        self.fitted = Some(fitted);
        Ok(output)
    }

    /// Process `docs` with the state learned by `fit_transform`.
    pub fn transform<S: AsRef<str> + Sync>(&self, docs: &[S]) -> Result<Vec<Vec<String>>> {
        self.fitted()?.transform(docs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{AnalyzedToken, PosTag};

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn small_corpus_config() -> PreprocessorConfig {
        PreprocessorConfig { min_count: 1, n_gram_threshold: 1.0, ..Default::default() }
    }

    const DOCS: [&str; 2] = ["Deep learning models are great.", "Deep learning is powerful."];

    /// Tags everything NOUN with the word as lemma; fails on "boom".
    struct Fragile;

    impl Analyzer for Fragile {
        fn analyze(&self, text: &str) -> anyhow::Result<Vec<AnalyzedToken>> {
            if text.contains("boom") {
                anyhow::bail!("cannot tag {text:?}");
            }
            Ok(text
                .split_whitespace()
                .map(|w| AnalyzedToken::new(w, w, PosTag::Noun))
                .collect())
        }

        fn name(&self) -> &str {
            "fragile"
        }
    }

    #[test]
    fn test_end_to_end() {
        let mut pre = Preprocessor::new(small_corpus_config()).unwrap();
        let out = pre.fit_transform(&DOCS).unwrap();
        assert_eq!(out, vec![toks(&["deep_learning", "model", "great"]), toks(&["deep_learning", "powerful"])]);

        let fitted = pre.fitted().unwrap();
        assert_eq!(fitted.phrase_model().passes(), 1);
        assert_eq!(fitted.phrase_model().phrase_count(), 1);
    }

    #[test]
    fn test_equation_and_phrase_end_to_end() {
        let docs = ["Deep Learning is great. $E=mc^2$", "Deep learning models are powerful"];
        let mut pre = Preprocessor::new(small_corpus_config()).unwrap();
        let out = pre.fit_transform(&docs).unwrap();
        assert_eq!(
            out,
            vec![toks(&["deep_learning", "great"]), toks(&["deep_learning", "model", "powerful"])]
        );
    }

    #[test]
    fn test_transform_unseen_documents() {
        let mut pre = Preprocessor::new(small_corpus_config()).unwrap();
        pre.fit_transform(&DOCS).unwrap();
        let out = pre.transform(&["Deep learning rocks", "", "$x$ and $y$"]).unwrap();
        assert_eq!(out, vec![toks(&["deep_learning", "rock"]), vec![], vec![]]);
    }

    #[test]
    fn test_transform_before_fit() {
        let pre = Preprocessor::new(PreprocessorConfig::default()).unwrap();
        assert!(!pre.is_fitted());
        assert!(matches!(pre.transform(&["anything"]), Err(PreprocessError::NotFitted)));
        assert!(matches!(pre.fitted(), Err(PreprocessError::NotFitted)));
    }

    #[test]
    fn test_equations_removed_before_tokenizing() {
        let mut pre = Preprocessor::new(PreprocessorConfig::default()).unwrap();
        let out = pre
            .fit_transform(&["Spectral   gaps $\\lambda_{max}$ of random graphs"])
            .unwrap();
        assert_eq!(out, vec![toks(&["spectral", "gap", "random", "graph"])]);
    }

    #[test]
    fn test_count_and_order_preserved() {
        let docs = ["the of and", "Quantum chaos", "", "  ", "Graph theory"];
        let mut pre = Preprocessor::new(PreprocessorConfig::default()).unwrap();
        let out = pre.fit_transform(&docs).unwrap();
        assert_eq!(out.len(), docs.len());
        assert!(out[0].is_empty());
        assert_eq!(out[1], toks(&["quantum", "chaos"]));
        assert!(out[2].is_empty() && out[3].is_empty());
        assert_eq!(out[4], toks(&["graph", "theory"]));
    }

    #[test]
    fn test_empty_batch() {
        let mut pre = Preprocessor::new(PreprocessorConfig::default()).unwrap();
        let out = pre.fit_transform::<&str>(&[]).unwrap();
        assert!(out.is_empty());
        assert!(pre.is_fitted());
        assert!(pre.transform::<&str>(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_no_passes_below_trigrams() {
        let config = PreprocessorConfig { max_n: 2, ..small_corpus_config() };
        let mut pre = Preprocessor::new(config).unwrap();
        let out = pre.fit_transform(&DOCS).unwrap();
        assert_eq!(out[1], toks(&["deep", "learning", "powerful"]));
        assert_eq!(pre.fitted().unwrap().phrase_model().passes(), 0);
    }

    #[test]
    fn test_refit_replaces_state() {
        let mut pre = Preprocessor::new(small_corpus_config()).unwrap();
        pre.fit_transform(&DOCS).unwrap();
        assert_eq!(pre.fitted().unwrap().phrase_model().phrase_count(), 1);

        pre.fit_transform(&["Graph theory", "Quantum chaos"]).unwrap();
        assert_eq!(pre.fitted().unwrap().phrase_model().phrase_count(), 0);
        let out = pre.transform(&["Deep learning"]).unwrap();
        assert_eq!(out, vec![toks(&["deep", "learning"])]);
    }

    #[test]
    fn test_additional_stopwords_and_pos_tags() {
        let config = PreprocessorConfig {
            additional_stopwords: vec!["Paper".into()],
            pos_tags: vec!["verb".into()],
            ..Default::default()
        };
        let mut pre = Preprocessor::new(config).unwrap();
        let out = pre.fit_transform(&["This paper proposed improved methods"]).unwrap();
        assert_eq!(out, vec![toks(&["propose", "improve"])]);
    }

    #[test]
    fn test_analyzer_failure_fails_batch() {
        let analyzer: Arc<dyn Analyzer> = Arc::new(Fragile);
        let mut pre = Preprocessor::with_analyzer(PreprocessorConfig::default(), analyzer).unwrap();
        let err = pre.fit_transform(&["fine words", "boom words", "boom again"]).unwrap_err();
        match err {
            PreprocessError::Analysis { index, message } => {
                assert_eq!(index, 1);
                assert!(message.contains("cannot tag"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!pre.is_fitted());
    }

    #[test]
    fn test_non_ascii_tokens_do_not_abort_batch() {
        let mut pre = Preprocessor::new(PreprocessorConfig::default()).unwrap();
        let out = pre.fit_transform(&["The \u{5555}ed sample", "\u{1000}ing"]).unwrap();
        assert_eq!(out, vec![toks(&["\u{5555}ed", "sample"]), toks(&["\u{1000}ing"])]);
        let again = pre.transform(&["\u{5555}\u{5555}\u{5555}ing results"]).unwrap();
        assert_eq!(again, vec![toks(&["\u{5555}\u{5555}\u{5555}ing", "result"])]);
    }

    #[test]
    fn test_proper_nouns_come_from_lexicon() {
        let mut lexicon = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut lexicon, br#"{"hubble": {"pos": "PROPN", "lemma": "Hubble"}}"#)
            .unwrap();
        let docs = ["Hubble telescope images"];
        let config = PreprocessorConfig { pos_tags: vec!["PROPN".into()], ..Default::default() };

        // Tokens are lowercased, so capitalisation alone yields no PROPN.
        let mut plain = Preprocessor::new(config.clone()).unwrap();
        assert_eq!(plain.fit_transform(&docs).unwrap(), vec![Vec::<String>::new()]);

        let config = PreprocessorConfig { lexicon: Some(lexicon.path().to_path_buf()), ..config };
        let mut with_lexicon = Preprocessor::new(config).unwrap();
        assert_eq!(with_lexicon.fit_transform(&docs).unwrap(), vec![toks(&["Hubble"])]);
    }

    #[test]
    fn test_custom_analyzer_is_used() {
        let analyzer: Arc<dyn Analyzer> = Arc::new(Fragile);
        let mut pre = Preprocessor::with_analyzer(PreprocessorConfig::default(), analyzer).unwrap();
        let out = pre.fit_transform(&["Models proposed"]).unwrap();
        assert_eq!(out, vec![toks(&["models", "proposed"])]);
        assert_eq!(pre.fitted().unwrap().analyzer().name(), "fragile");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PreprocessorConfig { min_token_len: 0, ..Default::default() };
        assert!(matches!(Preprocessor::new(config), Err(PreprocessError::InvalidConfig(_))));
    }

    #[test]
    fn test_fitted_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FittedPreprocessor>();

        let mut pre = Preprocessor::new(small_corpus_config()).unwrap();
        pre.fit_transform(&DOCS).unwrap();
        let fitted = Arc::new(pre.fitted().unwrap().clone());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let fitted = Arc::clone(&fitted);
                std::thread::spawn(move || fitted.transform(&["Deep learning models"]).unwrap())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), vec![toks(&["deep_learning", "model"])]);
        }
    }
}
