//! Preprocessor configuration and its JSON file form.
//!
//! Every field is optional in the file; missing fields take the defaults
//! the arXiv topic-modelling workflow was tuned with.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    english::{EnglishAnalyzer, Lexicon},
    error::{PreprocessError, Result},
    lemmatize::{PosFilter, DEFAULT_POS_TAGS},
    phrases::{PhraseConfig, Scoring, DEFAULT_DELIMITER, DEFAULT_MAX_N, DEFAULT_MIN_COUNT, DEFAULT_THRESHOLD},
    preprocess::DEFAULT_EQUATION_DELIMITER,
    stopwords::{BaseStopwords, StopwordSet},
    tokenize::{Tokenizer, DEFAULT_MAX_TOKEN_LEN, DEFAULT_MIN_TOKEN_LEN},
};

// ─────────────────────────────────────────────────────────────────────────────
// Schema
// ─────────────────────────────────────────────────────────────────────────────

/// Settings for every stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreprocessorConfig {
    /// Character delimiting inline equations.
    pub equation_delimiter: char,

    /// Shortest token kept, in characters.
    pub min_token_len: usize,

    /// Longest token kept, in characters.
    pub max_token_len: usize,

    /// Strip accents before tokenizing.
    pub deaccent: bool,

    pub base_stopwords: BaseStopwords,

    /// Extra stopwords on top of the base list.
    pub additional_stopwords: Vec<String>,

    /// Longest phrase length to learn; `3` learns bigrams only.
    pub max_n: usize,

    /// Score a bigram must exceed to become a phrase.
    pub n_gram_threshold: f64,

    pub min_count: u64,

    pub scoring: Scoring,

    /// Joins the parts of a phrase token.
    pub phrase_delimiter: String,

    /// Part-of-speech tags kept by the last stage (case-insensitive names).
    pub pos_tags: Vec<String>,

    /// Optional JSON lexicon for the bundled English analyzer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexicon: Option<PathBuf>,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            equation_delimiter: DEFAULT_EQUATION_DELIMITER,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
            deaccent: false,
            base_stopwords: BaseStopwords::Nltk,
            additional_stopwords: Vec::new(),
            max_n: DEFAULT_MAX_N,
            n_gram_threshold: DEFAULT_THRESHOLD,
            min_count: DEFAULT_MIN_COUNT,
            scoring: Scoring::Default,
            phrase_delimiter: DEFAULT_DELIMITER.to_string(),
            pos_tags: DEFAULT_POS_TAGS.iter().map(|t| t.to_string()).collect(),
            lexicon: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading and validation
// ─────────────────────────────────────────────────────────────────────────────

impl PreprocessorConfig {
    /// Read a config from a JSON file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| PreprocessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_slice(&bytes).map_err(|source| PreprocessError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PreprocessError::InvalidConfig(msg));

        if self.min_token_len == 0 {
            return invalid("min_token_len must be at least 1".into());
        }
        if self.min_token_len > self.max_token_len {
            return invalid(format!(
                "min_token_len ({}) exceeds max_token_len ({})",
                self.min_token_len, self.max_token_len
            ));
        }
        if !self.n_gram_threshold.is_finite() {
            return invalid(format!("n_gram_threshold must be finite, got {}", self.n_gram_threshold));
        }
        if self.scoring == Scoring::Npmi && !(-1.0..=1.0).contains(&self.n_gram_threshold) {
            return invalid(format!(
                "npmi threshold must lie in [-1, 1], got {}",
                self.n_gram_threshold
            ));
        }
        if self.phrase_delimiter.is_empty() {
            return invalid("phrase_delimiter must not be empty".into());
        }
        if self.phrase_delimiter.chars().any(char::is_whitespace) {
            return invalid(format!(
                "phrase_delimiter {:?} must not contain whitespace",
                self.phrase_delimiter
            ));
        }
        self.pos_filter()?;
        Ok(())
    }

    // ── Stage builders ───────────────────────────────────────────────────────

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new()
            .with_min_len(self.min_token_len)
            .with_max_len(self.max_token_len)
            .with_deaccent(self.deaccent)
    }

    pub fn stopwords(&self) -> StopwordSet {
        StopwordSet::from_base(&self.base_stopwords).with_additional(&self.additional_stopwords)
    }

    pub fn phrase_config(&self) -> PhraseConfig {
        PhraseConfig {
            max_n: self.max_n,
            threshold: self.n_gram_threshold,
            min_count: self.min_count,
            scoring: self.scoring,
            delimiter: self.phrase_delimiter.clone(),
        }
    }

    pub fn pos_filter(&self) -> Result<PosFilter> {
        PosFilter::from_names(&self.pos_tags)
    }

    /// The bundled English analyzer, with the configured lexicon loaded.
    pub fn english_analyzer(&self) -> Result<EnglishAnalyzer> {
        let analyzer = EnglishAnalyzer::new().with_delimiter(&self.phrase_delimiter);
        match &self.lexicon {
            Some(path) => {
                let lexicon = Lexicon::from_json_file(path)?;
                log::debug!("loaded {} lexicon entries from {}", lexicon.len(), path.display());
                Ok(analyzer.with_lexicon(lexicon))
            }
            None => Ok(analyzer),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
