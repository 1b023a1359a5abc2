//! Statistical n-gram phrase detection.
//!
//! Fitting runs `max_n - 2` passes over the corpus.  Each pass counts unigrams
//! and adjacent bigrams, scores every bigram and keeps those scoring above the
//! threshold as a [`PhraseRule`].  The rule is applied before the next pass,
//! so pass two sees `deep_learning` as a single unit and can learn
//! `deep_learning_model`.
//!
//! Applying a [`PhraseModel`] replays the rules in learned order and never
//! touches the counts again: a pair that was not frequent in the fit corpus is
//! never merged.

use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::batch;

/// Default `max_n`: one bigram pass.
pub const DEFAULT_MAX_N: usize = 3;

/// Default score threshold for the `default` scorer.
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// Default minimum bigram count.
pub const DEFAULT_MIN_COUNT: u64 = 5;

/// Default separator between the parts of a merged token.
pub const DEFAULT_DELIMITER: &str = "_";

// ─────────────────────────────────────────────────────────────────────────────
// Scoring
// ─────────────────────────────────────────────────────────────────────────────

/// Bigram scoring function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Scoring {
    /// `(count(ab) - min_count) / (count(a) * count(b)) * vocab_len`
    #[default]
    Default,
    /// Normalised pointwise mutual information, in `[-1, 1]`.
    Npmi,
}

/// Counts for one candidate bigram within a pass.
#[derive(Debug, Clone, Copy)]
struct BigramStats {
    left: u64,
    right: u64,
    pair: u64,
    vocab_len: u64,
    word_count: u64,
}

impl Scoring {
    fn score(self, s: BigramStats, min_count: u64) -> f64 {
        match self {
            Scoring::Default => {
                let denom = s.left as f64 * s.right as f64;
                if denom == 0.0 {
                    return f64::NEG_INFINITY;
                }
                (s.pair as f64 - min_count as f64) / denom * s.vocab_len as f64
            }
            Scoring::Npmi => {
                if s.pair < min_count || s.word_count == 0 {
                    return f64::NEG_INFINITY;
                }
                let total = s.word_count as f64;
                let pa = s.left as f64 / total;
                let pb = s.right as f64 / total;
                let pab = s.pair as f64 / total;
                let neg_log_pab = -pab.ln();
                if neg_log_pab == 0.0 {
                    // Every word in the corpus is this bigram.
                    return f64::NEG_INFINITY;
                }
                (pab / (pa * pb)).ln() / neg_log_pab
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for phrase detection.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseConfig {
    /// Phrases are learned for n in `2..max_n`; values below 3 learn nothing.
    pub max_n: usize,
    /// Bigrams must score strictly above this to merge.
    pub threshold: f64,
    /// Bigrams seen fewer times than this never score positively.
    pub min_count: u64,
    pub scoring: Scoring,
    pub delimiter: String,
}

impl Default for PhraseConfig {
    fn default() -> Self {
        Self {
            max_n: DEFAULT_MAX_N,
            threshold: DEFAULT_THRESHOLD,
            min_count: DEFAULT_MIN_COUNT,
            scoring: Scoring::Default,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl PhraseConfig {
    /// Number of passes a fit will run.
    pub fn passes(&self) -> usize {
        self.max_n.saturating_sub(2)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rules and model
// ─────────────────────────────────────────────────────────────────────────────

/// A learned merge: the joined token and the score it passed with.
#[derive(Debug, Clone, PartialEq)]
pub struct Phrase {
    pub token: String,
    pub score: f64,
}

/// One pass worth of merges, keyed by `(left, right)`.
#[derive(Debug, Clone, Default)]
pub struct PhraseRule {
    merges: FxHashMap<String, FxHashMap<String, Phrase>>,
    len: usize,
}

impl PhraseRule {
    fn insert(&mut self, left: &str, right: &str, phrase: Phrase) {
        let slot = self.merges.entry(left.to_string()).or_default();
        if slot.insert(right.to_string(), phrase).is_none() {
            self.len += 1;
        }
    }

    /// The merge for the adjacent pair `(left, right)`, if learned.
    pub fn get(&self, left: &str, right: &str) -> Option<&Phrase> {
        self.merges.get(left).and_then(|m| m.get(right))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All `(merged token, score)` entries, in no particular order.
    pub fn phrases(&self) -> impl Iterator<Item = (&str, f64)> {
        self.merges
            .values()
            .flat_map(|m| m.values())
            .map(|p| (p.token.as_str(), p.score))
    }

    /// Merge learned pairs in one document, scanning left to right.
    ///
    /// A merged pair consumes both tokens, so in `a b c` with both `a_b` and
    /// `b_c` learned only `a_b` is produced.
    pub fn apply_document(&self, tokens: &[String]) -> Vec<String> {
        if self.is_empty() {
            return tokens.to_vec();
        }

        let mut out = Vec::with_capacity(tokens.len());
        let mut pending: Option<&String> = None;
        for word in tokens {
            match pending.take() {
                Some(prev) => match self.get(prev, word) {
                    Some(phrase) => out.push(phrase.token.clone()),
                    None => {
                        out.push(prev.clone());
                        pending = Some(word);
                    }
                },
                None => pending = Some(word),
            }
        }
        if let Some(prev) = pending {
            out.push(prev.clone());
        }
        out
    }
}

/// Ordered merge rules, one per pass.
#[derive(Debug, Clone, Default)]
pub struct PhraseModel {
    rules: Vec<PhraseRule>,
}

impl PhraseModel {
    /// The identity model.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[PhraseRule] {
        &self.rules
    }

    /// Number of learned passes (including passes that learned nothing).
    pub fn passes(&self) -> usize {
        self.rules.len()
    }

    /// Total merges across every pass.
    pub fn phrase_count(&self) -> usize {
        self.rules.iter().map(PhraseRule::len).sum()
    }

    /// Replay every rule, in learned order, over one document.
    pub fn apply_document(&self, tokens: &[String]) -> Vec<String> {
        self.rules
            .iter()
            .fold(tokens.to_vec(), |doc, rule| rule.apply_document(&doc))
    }

    /// Replay every rule over a batch, one output per input document.
    pub fn apply(&self, corpus: &[Vec<String>]) -> Vec<Vec<String>> {
        batch::map(corpus, |doc| self.apply_document(doc))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Detector
// ─────────────────────────────────────────────────────────────────────────────

/// Learns a [`PhraseModel`] from a tokenised corpus.
#[derive(Debug, Clone, Default)]
pub struct PhraseDetector {
    config: PhraseConfig,
}

impl PhraseDetector {
    pub fn new(config: PhraseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhraseConfig {
        &self.config
    }

    /// Learn the rules and return them with the fully merged corpus.
    pub fn fit(&self, corpus: Vec<Vec<String>>) -> (PhraseModel, Vec<Vec<String>>) {
        let mut processed = corpus;
        let mut rules = Vec::with_capacity(self.config.passes());

        for n in 2..self.config.max_n {
            let rule = self.learn_rule(&processed);
            info!("  n={}: learned {} phrases", n, rule.len());
            for (token, score) in rule.phrases() {
                debug!("    {} ({:.3})", token, score);
            }
            processed = batch::map(&processed, |doc| rule.apply_document(doc));
            rules.push(rule);
        }

        (PhraseModel { rules }, processed)
    }

    /// One counting-and-scoring pass.
    fn learn_rule(&self, corpus: &[Vec<String>]) -> PhraseRule {
        let mut unigrams: FxHashMap<&str, u64> = FxHashMap::default();
        let mut bigrams: FxHashMap<(&str, &str), u64> = FxHashMap::default();
        let mut word_count = 0u64;

        for doc in corpus {
            for word in doc {
                *unigrams.entry(word.as_str()).or_insert(0) += 1;
            }
            word_count += doc.len() as u64;
            for pair in doc.windows(2) {
                *bigrams.entry((pair[0].as_str(), pair[1].as_str())).or_insert(0) += 1;
            }
        }

        let vocab_len = (unigrams.len() + bigrams.len()) as u64;
        let mut rule = PhraseRule::default();
        for (&(left, right), &pair) in &bigrams {
            let stats = BigramStats {
                left: unigrams.get(left).copied().unwrap_or(0),
                right: unigrams.get(right).copied().unwrap_or(0),
                pair,
                vocab_len,
                word_count,
            };
            let score = self.config.scoring.score(stats, self.config.min_count);
            if score > self.config.threshold {
                let token = format!("{}{}{}", left, self.config.delimiter, right);
                rule.insert(left, right, Phrase { token, score });
            }
        }
        rule
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn corpus(texts: &[&str]) -> Vec<Vec<String>> {
        texts.iter().map(|t| doc(t)).collect()
    }

    fn low_threshold(max_n: usize) -> PhraseConfig {
        PhraseConfig {
            max_n,
            threshold: 1.0,
            min_count: 1,
            ..PhraseConfig::default()
        }
    }

    /// A corpus where "neural network" is frequent and everything else is noise.
    fn neural_corpus() -> Vec<Vec<String>> {
        let mut texts = Vec::new();
        let fillers = [
            "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota",
            "kappa",
        ];
        for (i, f) in fillers.iter().enumerate() {
            texts.push(format!("{} neural network {}", f, fillers[(i + 3) % fillers.len()]));
        }
        texts.iter().map(|t| doc(t)).collect()
    }

    #[test]
    fn test_default_score_formula() {
        let stats = BigramStats { left: 2, right: 2, pair: 2, vocab_len: 9, word_count: 7 };
        let score = Scoring::Default.score(stats, 1);
        assert!((score - 2.25).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn test_default_score_below_min_count_is_negative() {
        let stats = BigramStats { left: 2, right: 2, pair: 2, vocab_len: 9, word_count: 7 };
        assert!(Scoring::Default.score(stats, 5) < 0.0);
    }

    #[test]
    fn test_npmi_bounds() {
        // Always co-occurring pair scores 1.
        let stats = BigramStats { left: 2, right: 2, pair: 2, vocab_len: 6, word_count: 8 };
        let s = Scoring::Npmi.score(stats, 1);
        assert!((s - 1.0).abs() < 1e-12, "got {s}");

        let below = BigramStats { pair: 1, ..stats };
        assert_eq!(Scoring::Npmi.score(below, 2), f64::NEG_INFINITY);
    }

    #[test]
    fn test_fit_merges_frequent_bigram() {
        // neural_network scores (10 - 5) / (10 * 10) * 33 = 1.65.
        let detector = PhraseDetector::new(PhraseConfig {
            threshold: 1.0,
            min_count: 5,
            ..PhraseConfig::default()
        });
        let (model, fitted) = detector.fit(neural_corpus());

        assert_eq!(model.passes(), 1);
        assert_eq!(model.phrase_count(), 1);
        for d in &fitted {
            assert!(d.contains(&"neural_network".to_string()), "got {d:?}");
            assert!(!d.contains(&"neural".to_string()));
        }

        let applied = model.apply(&corpus(&["a neural network and neural nets"]));
        assert_eq!(applied[0], doc("a neural_network and neural nets"));
    }

    #[test]
    fn test_apply_never_invents_phrases() {
        let detector = PhraseDetector::new(PhraseConfig {
            threshold: 1.0,
            ..PhraseConfig::default()
        });
        let (model, _) = detector.fit(neural_corpus());
        assert_eq!(model.phrase_count(), 1);
        let unseen = corpus(&["quantum field theory", "network neural"]);
        assert_eq!(model.apply(&unseen), unseen);
    }

    #[test]
    fn test_apply_is_deterministic() {
        let (model, _) = PhraseDetector::new(low_threshold(4)).fit(neural_corpus());
        let input = corpus(&["beta neural network alpha neural network", ""]);
        assert_eq!(model.apply(&input), model.apply(&input));
    }

    #[test]
    fn test_layered_passes_build_trigrams() {
        let mut texts = Vec::new();
        for i in 0..6 {
            texts.push(format!("w{i}a deep learning model w{i}b"));
        }
        let input: Vec<Vec<String>> = texts.iter().map(|t| doc(t)).collect();
        let config = PhraseConfig {
            max_n: 4,
            threshold: 1.0,
            min_count: 3,
            ..PhraseConfig::default()
        };
        let (model, fitted) = PhraseDetector::new(config).fit(input);

        assert_eq!(model.passes(), 2);
        // Pass one learns both deep_learning and learning_model; the greedy
        // scan keeps the left-most, leaving `model` for pass two.
        assert!(model.rules()[0].get("deep", "learning").is_some());
        assert!(model.rules()[0].get("learning", "model").is_some());
        assert!(model.rules()[1].get("deep_learning", "model").is_some());
        assert!(fitted.iter().all(|d| d.contains(&"deep_learning_model".to_string())));

        let applied = model.apply_document(&doc("a deep learning model here"));
        assert_eq!(applied, doc("a deep_learning_model here"));
    }

    #[test]
    fn test_greedy_left_to_right() {
        let mut rule = PhraseRule::default();
        rule.insert("a", "b", Phrase { token: "a_b".into(), score: 1.0 });
        rule.insert("b", "c", Phrase { token: "b_c".into(), score: 1.0 });
        assert_eq!(rule.apply_document(&doc("a b c")), doc("a_b c"));
        assert_eq!(rule.apply_document(&doc("x b c")), doc("x b_c"));
        assert_eq!(rule.len(), 2);
    }

    #[test]
    fn test_small_corpus_learns_nothing() {
        let input = corpus(&["deep learning", "deep learning"]);
        let (model, fitted) = PhraseDetector::new(PhraseConfig::default()).fit(input.clone());
        assert_eq!(model.passes(), 1);
        assert_eq!(model.phrase_count(), 0);
        assert_eq!(fitted, input);
    }

    #[test]
    fn test_max_n_below_three_runs_no_passes() {
        for max_n in [0, 1, 2] {
            let input = corpus(&["deep learning", "deep learning"]);
            let (model, fitted) = PhraseDetector::new(low_threshold(max_n)).fit(input.clone());
            assert_eq!(model.passes(), 0);
            assert_eq!(fitted, input);
        }
    }

    #[test]
    fn test_empty_corpus() {
        let (model, fitted) = PhraseDetector::new(low_threshold(3)).fit(Vec::new());
        assert_eq!(model.phrase_count(), 0);
        assert!(fitted.is_empty());
    }

    #[test]
    fn test_custom_delimiter() {
        let config = PhraseConfig { delimiter: "-".into(), ..low_threshold(3) };
        let input = corpus(&["deep learning great", "deep learning models powerful"]);
        let (_, fitted) = PhraseDetector::new(config).fit(input);
        assert_eq!(fitted[0], doc("deep-learning great"));
    }

    #[test]
    fn test_npmi_fit() {
        let config = PhraseConfig {
            threshold: 0.5,
            min_count: 3,
            scoring: Scoring::Npmi,
            ..PhraseConfig::default()
        };
        let (model, _) = PhraseDetector::new(config).fit(neural_corpus());
        let phrases: Vec<_> = model.rules()[0].phrases().map(|(t, _)| t.to_string()).collect();
        assert_eq!(phrases, vec!["neural_network".to_string()]);
    }

    #[test]
    fn test_scoring_serde_names() {
        assert_eq!(serde_json::to_string(&Scoring::Npmi).unwrap(), "\"npmi\"");
        let s: Scoring = serde_json::from_str("\"default\"").unwrap();
        assert_eq!(s, Scoring::Default);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_scoring_cli_names_match_serde() {
        use clap::ValueEnum;
        for scoring in Scoring::value_variants() {
            let name = scoring.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(serde_json::to_string(scoring).unwrap(), format!("\"{name}\""));
        }
        assert_eq!(Scoring::from_str("NPMI", true).unwrap(), Scoring::Npmi);
        assert!(Scoring::from_str("pmi", true).is_err());
    }
}
