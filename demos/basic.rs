//! Basic arxiv-preprocess example: fit on a handful of abstracts and
//! print the learned phrases and processed documents.
//!
//! Usage:
//!   cargo run --example basic
//!   cargo run --example basic -- --threshold 0.5 --max-n 4 --text "Deep learning for galaxies."

use arxiv_preprocess::{Preprocessor, PreprocessorConfig};

const ABSTRACTS: &[&str] = &[
    "Deep learning models achieve state of the art results on image classification.",
    "We study neural networks trained with deep learning on $\\mathbb{R}^n$ data.",
    "Graph neural networks generalise deep learning to relational data.",
    "Monte Carlo methods estimate   the partition function of spin glasses.",
    "We compare Monte Carlo methods with neural networks for spin glasses.",
];

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // ── Parse simple CLI arguments ───────────────────────────────────────────
    let mut args = std::env::args().skip(1).peekable();

    let mut threshold = 1.0f64;
    let mut min_count = 1u64;
    let mut max_n     = 3usize;
    let mut text      = "Applying deep learning to Monte Carlo simulations.".to_string();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--threshold" => { if let Some(v) = args.next() { threshold = v.parse().unwrap_or(1.0); } }
            "--min-count" => { if let Some(v) = args.next() { min_count = v.parse().unwrap_or(1); } }
            "--max-n"     => { if let Some(v) = args.next() { max_n     = v.parse().unwrap_or(3); } }
            "--text"      => { if let Some(v) = args.next() { text      = v; } }
            "--help"      => {
                println!("Usage: basic [--threshold FLOAT] [--min-count N] [--max-n N] [--text TEXT]");
                return Ok(());
            }
            _ => {}
        }
    }

    // ── Fit ──────────────────────────────────────────────────────────────────
    let config = PreprocessorConfig {
        n_gram_threshold: threshold,
        min_count,
        max_n,
        ..Default::default()
    };
    let mut pre = Preprocessor::new(config)?;
    let processed = pre.fit_transform(ABSTRACTS)?;

    println!("Learned phrases:");
    for rule in pre.fitted()?.phrase_model().rules() {
        for (phrase, score) in rule.phrases() {
            println!("  {phrase:<24} {score:>8.3}");
        }
    }

    println!("\nProcessed corpus:");
    for (doc, tokens) in ABSTRACTS.iter().zip(&processed) {
        println!("  {doc}\n    -> {tokens:?}");
    }

    // ── Transform new text ───────────────────────────────────────────────────
    let new = pre.transform(&[text.as_str()])?;
    println!("\n{text:?}\n    -> {:?}", new[0]);
    Ok(())
}
