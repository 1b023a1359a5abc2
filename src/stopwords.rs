//! Stopword filtering
//!
//! The default base list is NLTK's English list, which is what the arXiv
//! topic-modelling workflow was tuned against.  ISO lists for other
//! languages come from the `stop-words` crate.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

/// NLTK English stopwords (179 entries).
const NLTK_ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it",
    "it's", "its", "itself", "they", "them", "their", "theirs", "themselves",
    "what", "which", "who", "whom", "this", "that", "that'll", "these", "those",
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if",
    "or", "because", "as", "until", "while", "of", "at", "by", "for", "with",
    "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where",
    "why", "how", "all", "any", "both", "each", "few", "more", "most", "other",
    "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've",
    "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn",
    "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn",
    "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't",
    "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Where the base stopword list comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseStopwords {
    /// NLTK's English list.
    #[default]
    Nltk,
    /// The ISO list for a language code or name (`"en"`, `"german"`, ...).
    Iso(String),
    /// No base list; only the additional words.
    None,
}

/// Immutable set of words removed by the stopword stage.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: FxHashSet<String>,
}

impl StopwordSet {
    /// Empty set (filters nothing).
    pub fn empty() -> Self {
        Self::default()
    }

    /// NLTK's English stopwords.
    pub fn nltk_english() -> Self {
        Self::from_words(NLTK_ENGLISH)
    }

    /// ISO stopwords for `language`; unknown languages fall back to English.
    pub fn for_language(language: &str) -> Self {
        let lang = match language.to_lowercase().as_str() {
            "en" | "english" => LANGUAGE::English,
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            "ru" | "russian" => LANGUAGE::Russian,
            "sv" | "swedish" => LANGUAGE::Swedish,
            "da" | "danish" => LANGUAGE::Danish,
            "fi" | "finnish" => LANGUAGE::Finnish,
            "pl" | "polish" => LANGUAGE::Polish,
            _ => {
                log::warn!("no stopword list for language {language:?}, using English");
                LANGUAGE::English
            }
        };
        Self {
            words: get(lang).iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Build the base set described by `base`.
    pub fn from_base(base: &BaseStopwords) -> Self {
        match base {
            BaseStopwords::Nltk => Self::nltk_english(),
            BaseStopwords::Iso(language) => Self::for_language(language),
            BaseStopwords::None => Self::empty(),
        }
    }

    /// Set containing exactly `words`, lowercased.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        Self::empty().with_additional(words)
    }

    /// Add caller-supplied stopwords (lowercased, since tokens are).
    pub fn with_additional<S: AsRef<str>>(mut self, words: &[S]) -> Self {
        self.words
            .extend(words.iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Tokens not in the set, in their original order.
    pub fn filter(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .filter(|t| !self.contains(t))
            .cloned()
            .collect()
    }
}
