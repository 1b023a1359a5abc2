//! Rule-based English tagger and lemmatiser.
//!
//! Tuned for lowercased scientific prose.  Tagging order for each
//! whitespace-separated word:
//!
//! 1. user [`Lexicon`] entries (override everything);
//! 2. phrase tokens containing the phrase delimiter, tagged `NOUN` as a unit
//!    with the last component lemmatised (`neural_networks` -> `neural_network`);
//! 3. punctuation and numerals;
//! 4. closed-class words (determiners, pronouns, adpositions, conjunctions,
//!    auxiliaries, common adverbs, number words);
//! 5. the built-in open-class lexicon (adjectives, comparatives, irregular
//!    verbs, inflections of common regular verbs, irregular plurals);
//! 6. capitalised words past the first position and acronyms, tagged `PROPN`;
//! 7. suffix rules (`-ly`, adjective suffixes, `-ize`/`-ify`, `-ed`, `-ing`);
//! 8. everything else is a `NOUN`, singularised.
//!
//! The pipeline lowercases every token before analysis, so rule 6 never
//! fires inside [`Preprocessor`](crate::Preprocessor).  There, `PROPN` tags
//! come only from [`Lexicon`] entries.

use std::{collections::HashMap, path::Path};

use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::{
    analyze::{AnalyzedToken, Analyzer, PosTag},
    error::{PreprocessError, Result},
    phrases::DEFAULT_DELIMITER,
};

// ─────────────────────────────────────────────────────────────────────────────
// Word tables
// ─────────────────────────────────────────────────────────────────────────────

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "each", "every", "some", "any",
    "no", "all", "both", "either", "neither", "another", "such", "whatever", "whichever",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves", "you",
    "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she",
    "her", "hers", "herself", "it", "its", "itself", "they", "them", "their", "theirs",
    "themselves", "who", "whom", "whose", "what", "which", "something", "nothing",
    "anything", "everything", "someone", "anyone", "everyone", "nobody", "somebody",
    "everybody", "none",
];

const ADPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "from", "to", "into", "onto", "over",
    "under", "between", "among", "amongst", "through", "throughout", "during", "within",
    "without", "across", "along", "around", "against", "toward", "towards", "upon", "via",
    "per", "about", "above", "below", "beneath", "beyond", "despite", "except", "near",
    "behind", "beside", "besides", "inside", "outside", "underneath", "unlike", "versus",
    "amid", "after", "before", "like", "including", "regarding", "concerning", "following",
    "according",
];

const COORDINATORS: &[&str] = &["and", "or", "but", "nor", "yet", "plus"];

const SUBORDINATORS: &[&str] = &[
    "if", "because", "although", "though", "while", "whilst", "whereas", "whether",
    "unless", "since", "until", "than", "as", "once",
];

/// Auxiliaries with their lemma.
const AUXILIARIES: &[(&str, &str)] = &[
    ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"), ("be", "be"),
    ("been", "be"), ("being", "be"), ("am", "be"), ("have", "have"), ("has", "have"),
    ("had", "have"), ("having", "have"), ("do", "do"), ("does", "do"), ("did", "do"),
    ("doing", "do"), ("can", "can"), ("could", "could"), ("may", "may"),
    ("might", "might"), ("must", "must"), ("shall", "shall"), ("should", "should"),
    ("will", "will"), ("would", "would"),
];

const PARTICLES: &[&str] = &["not", "n't"];

const ADVERBS: &[&str] = &[
    "also", "very", "however", "thus", "therefore", "here", "there", "then", "now",
    "often", "always", "never", "well", "still", "even", "only", "just", "further",
    "furthermore", "moreover", "hence", "already", "again", "almost", "rather", "quite",
    "too", "instead", "indeed", "perhaps", "else", "ever", "soon", "sometimes",
    "together", "otherwise", "nevertheless", "nonetheless", "namely", "where", "when",
    "why", "how", "whereby", "thereby", "herein", "up", "down", "out", "off", "away",
    "back", "forth", "ago", "etc", "more", "most", "less", "least", "so",
];

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "twenty", "thirty", "forty", "fifty", "hundred", "thousand",
    "million", "billion", "trillion", "dozen",
];

/// Adjectives not caught by suffix rules.
const ADJECTIVES: &[&str] = &[
    "great", "good", "bad", "new", "large", "small", "high", "low", "deep", "big",
    "little", "long", "short", "old", "young", "recent", "different", "efficient",
    "significant", "relevant", "important", "robust", "novel", "simple", "complex",
    "accurate", "current", "main", "key", "strong", "weak", "fast", "slow", "hard",
    "easy", "wide", "broad", "narrow", "rich", "full", "free", "open", "real", "true",
    "false", "common", "rare", "similar", "specific", "various", "certain", "available",
    "prior", "dense", "sparse", "linear", "nonlinear", "stable", "unstable",
    "sufficient", "consistent", "independent", "dependent", "due", "first", "second",
    "third", "last", "next", "previous", "same", "other", "own", "whole", "single",
    "multiple", "several", "many", "few", "much", "modern", "early", "late", "hot",
    "cold", "dark", "bright", "random", "uniform", "excellent", "promising", "existing",
    "underlying", "interesting", "challenging", "emerging", "leading", "supervised",
    "unsupervised", "explicit", "implicit", "direct", "indirect", "exact",
    "approximate", "complete", "incomplete", "discrete", "continuous", "finite",
    "infinite", "extensive", "intensive", "clear", "precise", "difficult", "possible",
    "impossible", "likely", "unlikely", "daily",
];

/// Comparative and superlative adjectives with their base form.
const COMPARATIVES: &[(&str, &str)] = &[
    ("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad"),
    ("larger", "large"), ("largest", "large"), ("higher", "high"), ("highest", "high"),
    ("lower", "low"), ("lowest", "low"), ("smaller", "small"), ("smallest", "small"),
    ("greater", "great"), ("greatest", "great"), ("deeper", "deep"), ("deepest", "deep"),
    ("faster", "fast"), ("fastest", "fast"), ("stronger", "strong"),
    ("strongest", "strong"), ("longer", "long"), ("longest", "long"), ("wider", "wide"),
    ("widest", "wide"), ("simpler", "simple"), ("simplest", "simple"),
    ("easier", "easy"), ("easiest", "easy"), ("harder", "hard"), ("hardest", "hard"),
    ("bigger", "big"), ("biggest", "big"), ("newer", "new"), ("newest", "new"),
    ("older", "old"), ("oldest", "old"), ("weaker", "weak"), ("weakest", "weak"),
    ("earlier", "early"), ("later", "late"), ("latest", "late"),
];

/// Irregular (or noun-ambiguous) verb forms with their base form.
const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("shown", "show"), ("found", "find"), ("made", "make"), ("gave", "give"),
    ("given", "give"), ("taken", "take"), ("took", "take"), ("seen", "see"),
    ("saw", "see"), ("known", "know"), ("knew", "know"), ("done", "do"),
    ("became", "become"), ("become", "become"), ("becomes", "become"),
    ("began", "begin"), ("begun", "begin"), ("brought", "bring"), ("built", "build"),
    ("chose", "choose"), ("chosen", "choose"), ("drew", "draw"), ("drawn", "draw"),
    ("felt", "feel"), ("fell", "fall"), ("fallen", "fall"), ("held", "hold"),
    ("kept", "keep"), ("led", "lead"), ("lost", "lose"), ("meant", "mean"),
    ("met", "meet"), ("paid", "pay"), ("ran", "run"), ("said", "say"), ("sent", "send"),
    ("sought", "seek"), ("spent", "spend"), ("stood", "stand"), ("taught", "teach"),
    ("thought", "think"), ("told", "tell"), ("understood", "understand"),
    ("wrote", "write"), ("written", "write"), ("got", "get"), ("gotten", "get"),
    ("grew", "grow"), ("grown", "grow"), ("arose", "arise"), ("arisen", "arise"),
    ("undergone", "undergo"), ("went", "go"), ("gone", "go"), ("proven", "prove"),
    ("caught", "catch"), ("dealt", "deal"), ("used", "use"), ("using", "use"),
    ("based", "base"), ("trained", "train"), ("learned", "learn"), ("learnt", "learn"),
];

/// Regular verbs recognised in every inflection.  Verbs that commonly head
/// noun phrases in abstracts (`learning`, `training`, `computing`, `use`,
/// `study`, `result`) are absent and stay nouns.
const VERB_BASES: &[&str] = &[
    "propose", "present", "show", "demonstrate", "achieve", "provide", "introduce",
    "obtain", "develop", "improve", "outperform", "investigate", "describe", "apply",
    "derive", "employ", "exhibit", "reveal", "suggest", "consider", "perform", "require",
    "enable", "allow", "leverage", "utilize", "yield", "reduce", "increase", "explore",
    "examine", "evaluate", "compare", "predict", "identify", "generate", "establish",
    "extend", "address", "observe", "detect", "measure", "solve", "argue", "discuss",
    "report", "find", "give", "make", "take", "become", "remain", "seem", "appear",
    "contain", "include", "involve", "depend", "lead", "exist", "occur", "emerge",
    "implement", "validate", "verify", "capture", "incorporate", "combine", "construct",
    "design", "determine", "characterize", "quantify", "enhance", "mitigate", "explain",
];

/// Plurals that suffix stripping gets wrong.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("children", "child"), ("people", "person"), ("men", "man"), ("women", "woman"),
    ("mice", "mouse"), ("feet", "foot"), ("teeth", "tooth"), ("geese", "goose"),
    ("criteria", "criterion"), ("phenomena", "phenomenon"), ("analyses", "analysis"),
    ("hypotheses", "hypothesis"), ("theses", "thesis"), ("syntheses", "synthesis"),
    ("diagnoses", "diagnosis"), ("axes", "axis"), ("indices", "index"),
    ("matrices", "matrix"), ("vertices", "vertex"), ("appendices", "appendix"),
    ("spectra", "spectrum"), ("quanta", "quantum"), ("maxima", "maximum"),
    ("minima", "minimum"), ("optima", "optimum"), ("formulae", "formula"),
    ("radii", "radius"), ("nuclei", "nucleus"), ("foci", "focus"), ("stimuli", "stimulus"),
    ("loci", "locus"), ("lives", "life"), ("knives", "knife"), ("wives", "wife"),
    ("wolves", "wolf"), ("leaves", "leaf"), ("halves", "half"), ("shelves", "shelf"),
    ("selves", "self"), ("caches", "cache"), ("niches", "niche"),
    ("avalanches", "avalanche"), ("movies", "movie"), ("cookies", "cookie"),
];

/// Nouns whose plural looks like (or is) the singular.
const INVARIANT_NOUNS: &[&str] = &[
    "data", "series", "species", "physics", "mathematics", "economics", "news", "means",
    "lens", "gas", "atlas", "canvas", "alias", "bias", "chaos", "cosmos", "ethos",
    "pancreas", "corpus", "status", "consensus", "focus", "analysis", "basis", "thesis",
    "axis", "crisis", "dynamics", "kinetics", "mechanics", "electronics", "genetics",
    "linguistics", "robotics", "optics", "photonics", "thermodynamics", "biosynthesis",
];

/// Words ending in `-ly` that are not adverbs.
const LY_NOUNS: &[&str] = &[
    "family", "anomaly", "assembly", "supply", "monopoly", "reply", "rally", "ally",
    "italy", "butterfly", "jelly", "belly", "homily",
];

/// Words with an adjective suffix that are nouns.
const SUFFIX_NOUNS: &[&str] = &[
    "signal", "proposal", "interval", "material", "potential", "journal", "animal",
    "capital", "hospital", "terminal", "tutorial", "manual", "rival", "festival",
    "metal", "crystal", "portal", "arrival", "approval", "removal", "retrieval", "trial",
    "denial", "survival", "rental", "mineral", "total", "individual", "principal",
    "integral", "differential", "polynomial", "functional", "logic", "music", "topic",
    "traffic", "clinic", "republic", "rhetoric", "arithmetic", "panic", "mechanic",
    "fabric", "metric", "heuristic", "detective", "executive", "relative", "derivative",
    "alternative", "initiative", "representative", "perspective", "incentive",
    "narrative", "directive", "objective", "primitive", "dictionary", "summary",
    "library", "boundary", "vocabulary", "salary", "anniversary", "glossary",
    "commentary", "secretary", "adversary", "table", "cable", "variable", "vegetable",
    "timetable", "observable", "deliverable", "english",
];

/// Words ending in `-ed` that are not verb forms.
const ED_NON_VERBS: &[&str] = &[
    "speed", "seed", "need", "feed", "greed", "breed", "hundred", "sacred", "naked",
    "wicked", "rugged", "kindred", "embed", "shed", "bed", "red",
];

const ADJ_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "ical", "less", "ish", "ary", "ic", "al",
];

const VERB_SUFFIXES: &[&str] = &[
    "ize", "izes", "ized", "izing", "ify", "ifies", "ified", "ifying",
];

static CLOSED_CLASS: Lazy<FxHashMap<&'static str, (PosTag, &'static str)>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    let groups: [(&[&str], PosTag); 8] = [
        (NUMBER_WORDS, PosTag::Num),
        (ADVERBS, PosTag::Adv),
        (PARTICLES, PosTag::Part),
        (SUBORDINATORS, PosTag::Sconj),
        (COORDINATORS, PosTag::Cconj),
        (ADPOSITIONS, PosTag::Adp),
        (PRONOUNS, PosTag::Pron),
        (DETERMINERS, PosTag::Det),
    ];
    // Later groups win on overlap.
    for (words, tag) in groups {
        for &w in words {
            map.insert(w, (tag, w));
        }
    }
    for &(w, lemma) in AUXILIARIES {
        map.insert(w, (PosTag::Aux, lemma));
    }
    map
});

static NOUN_FORMS: Lazy<FxHashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map: FxHashMap<_, _> = IRREGULAR_PLURALS.iter().copied().collect();
    map.extend(INVARIANT_NOUNS.iter().map(|&w| (w, w)));
    map
});

static OPEN_CLASS: Lazy<FxHashMap<&'static str, (PosTag, &'static str)>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    for (&w, &lemma) in NOUN_FORMS.iter() {
        map.insert(w, (PosTag::Noun, lemma));
    }
    for &(w, lemma) in IRREGULAR_VERBS {
        map.insert(w, (PosTag::Verb, lemma));
    }
    for &(w, lemma) in COMPARATIVES {
        map.insert(w, (PosTag::Adj, lemma));
    }
    for &w in ADJECTIVES {
        map.insert(w, (PosTag::Adj, w));
    }
    map
});

static VERB_BASE_SET: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| VERB_BASES.iter().copied().collect());
static LY_NOUN_SET: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| LY_NOUNS.iter().copied().collect());
static SUFFIX_NOUN_SET: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| SUFFIX_NOUNS.iter().copied().collect());
static ED_NON_VERB_SET: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| ED_NON_VERBS.iter().copied().collect());

// ─────────────────────────────────────────────────────────────────────────────
// Lemma rules
// ─────────────────────────────────────────────────────────────────────────────

fn strip(word: &str, suffix_len: usize) -> &str {
    &word[..word.len() - suffix_len]
}

/// Singular form of a (lowercase) noun.
pub fn singularize(word: &str) -> String {
    if let Some(&lemma) = NOUN_FORMS.get(word) {
        return lemma.to_string();
    }
    if word.chars().count() <= 3 {
        return word.to_string();
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    if word.ends_with("ies") && word.len() > 4 {
        return format!("{}y", strip(word, 3));
    }
    for suffix in ["sses", "shes", "ches", "xes", "zzes"] {
        if word.ends_with(suffix) {
            return strip(word, 2).to_string();
        }
    }
    if word.ends_with('s') {
        return strip(word, 1).to_string();
    }
    word.to_string()
}

/// Drop a doubled final ASCII consonant (`stopp` -> `stop`), except l/s/z/f.
fn undouble(stem: &str) -> Option<&str> {
    let mut rev = stem.chars().rev();
    let (last, prev) = (rev.next()?, rev.next()?);
    let doubled = last == prev
        && last.is_ascii_alphabetic()
        && !"aeioulszf".contains(last)
        && rev.next().is_some();
    doubled.then(|| &stem[..stem.len() - last.len_utf8()])
}

/// Candidate base forms of a possibly inflected verb, most likely first.
fn verb_candidates(word: &str) -> Vec<String> {
    let mut out = vec![word.to_string()];
    if let Some(stem) = word.strip_suffix("ies") {
        out.push(format!("{stem}y"));
    } else if let Some(stem) = word.strip_suffix("ied") {
        out.push(format!("{stem}y"));
    } else if let Some(stem) = word.strip_suffix("es") {
        out.push(format!("{stem}e"));
        out.push(stem.to_string());
    } else if let Some(stem) = word.strip_suffix('s') {
        out.push(stem.to_string());
    } else if let Some(stem) = word.strip_suffix("ed") {
        out.push(format!("{stem}e"));
        out.push(stem.to_string());
        if let Some(short) = undouble(stem) {
            out.push(short.to_string());
        }
    } else if let Some(stem) = word.strip_suffix("ing") {
        out.push(format!("{stem}e"));
        out.push(stem.to_string());
        if let Some(short) = undouble(stem) {
            out.push(short.to_string());
        }
        if let Some(stem) = stem.strip_suffix('y') {
            // dying -> die
            out.push(format!("{stem}ie"));
        }
    }
    out
}

/// Best-effort base form for a verb not in the lexicon.
fn guess_verb_lemma(word: &str) -> String {
    const E_ENDINGS: &[&str] = &["iz", "at", "v", "bl", "us", "uc", "ur", "dg", "rg", "ag", "as"];

    if let Some(stem) = word.strip_suffix("ied").or_else(|| word.strip_suffix("ies")) {
        return format!("{stem}y");
    }
    for suffix in ["ed", "ing"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            if let Some(short) = undouble(stem) {
                return short.to_string();
            }
            if E_ENDINGS.iter().any(|e| stem.ends_with(e)) {
                return format!("{stem}e");
            }
            return stem.to_string();
        }
    }
    for suffix in ["sses", "shes", "ches", "xes"] {
        if word.ends_with(suffix) {
            return strip(word, 2).to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !word.ends_with("ss") => stem.to_string(),
        _ => word.to_string(),
    }
}

fn known_verb(word: &str) -> Option<String> {
    verb_candidates(word)
        .into_iter()
        .find(|c| VERB_BASE_SET.contains(c.as_str()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Lexicon
// ─────────────────────────────────────────────────────────────────────────────

/// One user-supplied lexicon entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub pos: PosTag,
    /// Defaults to the word itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
}

/// Word -> tag/lemma overrides, consulted before any rule.
///
/// JSON form: `{"transformer": {"pos": "NOUN"}, "mice": {"pos": "NOUN", "lemma": "mouse"}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon {
    entries: HashMap<String, LexiconEntry>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a lexicon from a JSON file.
    ///
    /// Any failure means the analyzer cannot be built, so it is reported as
    /// [`PreprocessError::AnalyzerUnavailable`].
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            PreprocessError::AnalyzerUnavailable(format!(
                "cannot read lexicon {}: {e}",
                path.display()
            ))
        })?;
        let raw: HashMap<String, LexiconEntry> = serde_json::from_slice(&bytes).map_err(|e| {
            PreprocessError::AnalyzerUnavailable(format!(
                "cannot parse lexicon {}: {e}",
                path.display()
            ))
        })?;
        let mut lexicon = Self::new();
        for (word, entry) in raw {
            lexicon.entries.insert(word.to_lowercase(), entry);
        }
        Ok(lexicon)
    }

    pub fn insert(&mut self, word: &str, pos: PosTag, lemma: Option<&str>) {
        self.entries.insert(
            word.to_lowercase(),
            LexiconEntry { pos, lemma: lemma.map(str::to_string) },
        );
    }

    pub fn with_entry(mut self, word: &str, pos: PosTag, lemma: Option<&str>) -> Self {
        self.insert(word, pos, lemma);
        self
    }

    pub fn get(&self, word: &str) -> Option<&LexiconEntry> {
        self.entries.get(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EnglishAnalyzer
// ─────────────────────────────────────────────────────────────────────────────

/// The bundled [`Analyzer`]: closed-class tables, an open-class lexicon and
/// suffix rules.  Never fails.
///
/// Any word containing the delimiter is treated as a phrase token, whether
/// or not the phrase detector produced it.  `_` is a word character for the
/// tokenizer, so raw input such as `snake_case` is also tagged `NOUN`.
#[derive(Debug, Clone)]
pub struct EnglishAnalyzer {
    lexicon: Lexicon,
    delimiter: String,
}

impl Default for EnglishAnalyzer {
    fn default() -> Self {
        Self {
            lexicon: Lexicon::new(),
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl EnglishAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Separator used by phrase tokens; must match the phrase detector's.
    pub fn with_delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = delimiter.to_string();
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Tag and lemmatise a single word; `position` is its index in the text.
    pub fn analyze_word(&self, word: &str, position: usize) -> AnalyzedToken {
        let lower = word.to_lowercase();
        let (pos, lemma) = self.tag(word, &lower, position);
        AnalyzedToken::new(word, lemma, pos)
    }

    fn tag(&self, word: &str, lower: &str, position: usize) -> (PosTag, String) {
        if let Some(entry) = self.lexicon.get(lower) {
            let lemma = entry.lemma.clone().unwrap_or_else(|| lower.to_string());
            return (entry.pos, lemma);
        }

        if !self.delimiter.is_empty() {
            if let Some((head, last)) = lower.rsplit_once(self.delimiter.as_str()) {
                if !head.is_empty() && !last.is_empty() {
                    let lemma = format!("{head}{}{}", self.delimiter, singularize(last));
                    return (PosTag::Noun, lemma);
                }
            }
        }

        if !lower.chars().any(char::is_alphanumeric) {
            return (PosTag::Punct, lower.to_string());
        }
        if lower.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return (PosTag::Num, lower.to_string());
        }

        if let Some(&(pos, lemma)) = CLOSED_CLASS.get(lower) {
            return (pos, lemma.to_string());
        }
        if let Some(&(pos, lemma)) = OPEN_CLASS.get(lower) {
            return (pos, lemma.to_string());
        }
        if let Some(base) = known_verb(lower) {
            return (PosTag::Verb, base);
        }

        if is_proper_noun(word, position) {
            return (PosTag::Propn, word.to_string());
        }

        suffix_tag(lower)
    }
}

/// Capitalised past the first word, or an all-caps acronym.
fn is_proper_noun(word: &str, position: usize) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let acronym = word.chars().count() >= 2
        && word.chars().all(|c| c.is_uppercase() || c.is_ascii_digit())
        && word.chars().any(char::is_alphabetic);
    acronym || (position > 0 && first.is_uppercase())
}

fn suffix_tag(lower: &str) -> (PosTag, String) {
    let len = lower.chars().count();

    if len > 4 && lower.ends_with("ly") {
        if LY_NOUN_SET.contains(lower) {
            return (PosTag::Noun, lower.to_string());
        }
        return (PosTag::Adv, lower.to_string());
    }

    if len >= 5 && !SUFFIX_NOUN_SET.contains(lower) && ADJ_SUFFIXES.iter().any(|s| lower.ends_with(s))
    {
        return (PosTag::Adj, lower.to_string());
    }

    if len > 5 && VERB_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        let lemma = if lower.ends_with("ify") || lower.ends_with("ize") {
            lower.to_string()
        } else {
            guess_verb_lemma(lower)
        };
        return (PosTag::Verb, lemma);
    }

    if len > 4 && lower.ends_with("ed") && !ED_NON_VERB_SET.contains(lower) && !lower.ends_with("eed")
    {
        return (PosTag::Verb, guess_verb_lemma(lower));
    }

    if len > 4 && lower.ends_with("ing") {
        return (PosTag::Noun, lower.to_string());
    }

    (PosTag::Noun, singularize(lower))
}

impl Analyzer for EnglishAnalyzer {
    fn analyze(&self, text: &str) -> anyhow::Result<Vec<AnalyzedToken>> {
        Ok(text
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| self.analyze_word(word, i))
            .collect())
    }

    fn name(&self) -> &str {
        "english-rules"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
