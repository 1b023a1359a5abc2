//! # arxiv-preprocess
//!
//! Turns raw scientific abstracts into phrase-aware, lemmatised token lists
//! for topic modelling.
//!
//! ## Quick start
//!
//! ```
//! use arxiv_preprocess::{Preprocessor, PreprocessorConfig};
//!
//! // Tiny corpora need a low bar for phrase detection.
//! let config = PreprocessorConfig {
//!     min_count: 1,
//!     n_gram_threshold: 1.0,
//!     ..Default::default()
//! };
//! let mut pre = Preprocessor::new(config).unwrap();
//!
//! let docs = ["Deep learning models are great.", "Deep learning is powerful."];
//! let out = pre.fit_transform(&docs).unwrap();
//! assert_eq!(out[0], vec!["deep_learning", "model", "great"]);
//!
//! // Reuse the learned phrases on new text.
//! let new = pre.transform(&["We apply deep learning to $x^2$ galaxies."]).unwrap();
//! assert_eq!(new[0], vec!["deep_learning", "galaxy"]);
//! ```
//!
//! ## Pipeline
//! 1. **Equation stripping**: `$...$` spans are deleted (unbalanced `$` is left alone).
//! 2. **Whitespace normalisation**: runs of whitespace become one space.
//! 3. **Tokenisation**: lowercase alphabetic tokens of 3 to 15 characters.
//! 4. **Stopword removal**: NLTK English list plus caller additions.
//! 5. **Phrase detection**: frequent adjacent pairs merge into `left_right`,
//!    layered over `max_n - 2` passes.
//! 6. **Lemmatisation**: an [`Analyzer`] tags and lemmatises; only nouns,
//!    adjectives and proper nouns are kept by default.
//!
//! ## Cargo features
//! | Feature    | Effect                                                       |
//! |------------|--------------------------------------------------------------|
//! | `parallel` | Per-document stages run on rayon's pool (order preserved)    |
//! | `cli`      | Builds the `arxiv-preprocess` binary (clap + env_logger)     |

pub mod analyze;
mod batch;
pub mod config;
pub mod english;
pub mod error;
pub mod lemmatize;
pub mod phrases;
pub mod pipeline;
pub mod preprocess;
pub mod stopwords;
pub mod tokenize;

// ─── Re-exports for convenience ─────────────────────────────────────────────

pub use analyze::{AnalyzedToken, Analyzer, PosTag};
pub use config::PreprocessorConfig;
pub use english::{EnglishAnalyzer, Lexicon};
pub use error::{PreprocessError, Result};
pub use lemmatize::PosFilter;
pub use phrases::{PhraseDetector, PhraseModel, Scoring};
pub use pipeline::{FittedPreprocessor, Preprocessor};
pub use stopwords::{BaseStopwords, StopwordSet};
pub use tokenize::Tokenizer;
