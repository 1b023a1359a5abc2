//! Error type shared by every pipeline stage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the preprocessing pipeline.
///
/// Soft conditions (unbalanced `$` delimiters, `max_n` below 3, an empty
/// batch, no phrase above threshold) are not errors; they fall through to
/// a no-op.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// `transform` was called before `fit_transform` populated the stopwords,
    /// phrase model and analyzer.
    #[error("preprocessor is not fitted: call fit_transform before transform")]
    NotFitted,

    /// The linguistic analyzer (or its lexicon) could not be loaded.
    #[error("linguistic analyzer unavailable: {0}")]
    AnalyzerUnavailable(String),

    /// The analyzer failed on one document; the whole batch is abandoned.
    #[error("analysis failed for document {index}: {message}")]
    Analysis { index: usize, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, PreprocessError>;
