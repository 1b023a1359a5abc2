//! arxiv-preprocess - fit the preprocessing pipeline on a corpus of abstracts
//!
//! Reads one abstract per line (or a JSON array with `--json`), writes one
//! JSON token array per document.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;

use arxiv_preprocess::{Preprocessor, PreprocessorConfig, Scoring};

/// Clean, tokenise, phrase-merge and lemmatise scientific abstracts
#[derive(Parser, Debug)]
#[command(name = "arxiv-preprocess")]
#[command(author, version, about)]
struct Args {
    /// Corpus to fit on
    input: PathBuf,

    /// Input files are JSON arrays of strings instead of one document per line
    #[arg(long)]
    json: bool,

    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Longest phrase length to learn
    #[arg(long)]
    max_n: Option<usize>,

    /// Phrase score threshold
    #[arg(long)]
    threshold: Option<f64>,

    /// Minimum pair count for phrase scoring
    #[arg(long)]
    min_count: Option<u64>,

    /// Phrase scoring function
    #[arg(long, value_enum, ignore_case = true)]
    scoring: Option<Scoring>,

    /// Extra stopword (repeatable)
    #[arg(long = "stopword")]
    stopwords: Vec<String>,

    /// Part-of-speech tag to keep (repeatable; replaces the default set)
    #[arg(long = "pos-tag")]
    pos_tags: Vec<String>,

    /// Transform this corpus with the fitted model and print it instead
    #[arg(long)]
    apply: Option<PathBuf>,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log every learned phrase with its score
    #[arg(long)]
    print_phrases: bool,
}

fn read_corpus(path: &Path, json: bool) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read corpus: {}", path.display()))?;
    if json {
        serde_json::from_str(&text)
            .with_context(|| format!("Expected a JSON array of strings in {}", path.display()))
    } else {
        Ok(text.lines().map(str::to_string).collect())
    }
}

fn build_config(args: &Args) -> Result<PreprocessorConfig> {
    let mut config = match &args.config {
        Some(path) => PreprocessorConfig::from_json_file(path)?,
        None => PreprocessorConfig::default(),
    };
    if let Some(max_n) = args.max_n {
        config.max_n = max_n;
    }
    if let Some(threshold) = args.threshold {
        config.n_gram_threshold = threshold;
    }
    if let Some(min_count) = args.min_count {
        config.min_count = min_count;
    }
    if let Some(scoring) = args.scoring {
        config.scoring = scoring;
    }
    config.additional_stopwords.extend(args.stopwords.iter().cloned());
    if !args.pos_tags.is_empty() {
        config.pos_tags = args.pos_tags.clone();
    }
    Ok(config)
}

fn write_jsonl(out: &mut dyn Write, docs: &[Vec<String>]) -> Result<()> {
    for doc in docs {
        serde_json::to_writer(&mut *out, doc)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = build_config(&args)?;
    let mut pre = Preprocessor::new(config).context("Failed to build preprocessor")?;

    let corpus = read_corpus(&args.input, args.json)?;
    let fitted_output = pre.fit_transform(&corpus)?;

    let model = pre.fitted()?.phrase_model();
    log::info!("Learned {} phrases over {} passes", model.phrase_count(), model.passes());
    if args.print_phrases {
        for (pass, rule) in model.rules().iter().enumerate() {
            for (phrase, score) in rule.phrases() {
                log::info!("  pass {}: {phrase} ({score:.3})", pass + 1);
            }
        }
    }

    let output = match &args.apply {
        Some(path) => pre.transform(&read_corpus(path, args.json)?)?,
        None => fitted_output,
    };

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    write_jsonl(sink.as_mut(), &output)?;
    Ok(())
}
