//! Preview the ingestion pipeline on a converted markup file.
//!
//! Reads converter output (markup, not the binary document), normalizes it,
//! splits it into works, relocates footnotes, and prints a per-work summary
//! plus a skeleton table of contents ready for review.
//!
//! Usage:
//!
//!   cargo run --bin ingest_preview -- input.md
//!   cargo run --bin ingest_preview -- input.md --toc

use manuscript_ingest::hebrew::DensityVocalization;
use manuscript_ingest::normalizer::Normalizer;
use manuscript_ingest::splitter::{has_multiple_works, split_works};
use manuscript_ingest::toc::{encode_toc, Inclusion, TocEntry};
use std::fs;
use std::process::ExitCode;

struct PreviewConfig {
    input: String,
    print_toc: bool,
}

impl PreviewConfig {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut print_toc = false;

        for arg in &args[1..] {
            match arg.as_str() {
                "--toc" => print_toc = true,
                "--help" | "-h" => return None,
                other => input = Some(other.to_string()),
            }
        }

        input.map(|input| Self { input, print_toc })
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let config = match PreviewConfig::from_args() {
        Some(config) => config,
        None => {
            eprintln!("usage: ingest_preview <input.md> [--toc]");
            return ExitCode::FAILURE;
        },
    };

    let raw = match fs::read_to_string(&config.input) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("cannot read {}: {}", config.input, e);
            return ExitCode::FAILURE;
        },
    };

    let classifier = DensityVocalization::new();
    let normalized = Normalizer::new(&classifier).normalize(&raw);
    let works = split_works(&normalized);

    println!(
        "{} work(s){}",
        works.len(),
        if has_multiple_works(&normalized) {
            " (separator markers present)"
        } else {
            " (implicit, no separator)"
        }
    );
    for (i, work) in works.iter().enumerate() {
        println!(
            "  {:>3}. {} ({} lines)",
            i + 1,
            work.title,
            work.content.lines().count()
        );
    }

    if config.print_toc {
        let entries: Vec<TocEntry> = works
            .iter()
            .map(|work| TocEntry {
                include: Inclusion::Include,
                title: work.title.clone(),
                contributors: String::new(),
                genre: String::new(),
                language: String::new(),
                rights: String::new(),
            })
            .collect();
        println!("{}", encode_toc(&entries));
    }

    ExitCode::SUCCESS
}
