//! `methali` command line: merge scraped proverbs into the corpus.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use methali_core::MergeConfig;
use methali_dedup::{merge, normalize, Corpus};
use methali_ingest::{load_incoming, IngestDefaults, IngestFormat};
use methali_storage::{load_corpus, save_corpus};

#[derive(Parser, Debug)]
#[command(name = "methali", version, about = "Deduplicate and merge proverb collections")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge an incoming batch into the corpus, backing up the previous file.
    Merge(MergeArgs),
    /// Print the canonical comparison key of each argument.
    Normalize { texts: Vec<String> },
    /// Summarize a corpus file.
    Stats {
        #[arg(long, default_value = "data/quotes.json")]
        corpus: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Corpus JSON file; created if missing.
    #[arg(long, default_value = "data/quotes.json")]
    pub corpus: PathBuf,
    /// Incoming batch.
    #[arg(long)]
    pub input: PathBuf,
    /// lines, delimited or json. Inferred from the extension when omitted.
    #[arg(long)]
    pub format: Option<IngestFormat>,
    /// Category for text records that carry none.
    #[arg(long, default_value = "")]
    pub category: String,
    /// Source label for text records. Defaults to the category.
    #[arg(long)]
    pub source: Option<String>,
    /// TOML file with merge settings.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the merge threshold.
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Override the retrieval cutoff.
    #[arg(long)]
    pub cutoff: Option<f64>,
    /// Override the candidate limit.
    #[arg(long)]
    pub limit: Option<usize>,
    /// Report what would change without writing.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub parsed: usize,
    pub existing: usize,
    pub added: usize,
    pub merged: usize,
    pub skipped: usize,
    pub records: usize,
    pub backup: Option<PathBuf>,
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReport {
    pub records: usize,
    pub total_count: u64,
    pub distinct_keys: usize,
    pub shadowed_duplicates: usize,
}

/// File config first, command line overrides on top.
pub fn resolve_config(args: &MergeArgs) -> Result<MergeConfig> {
    let mut config = match &args.config {
        Some(path) => MergeConfig::from_toml_file(path)
            .with_context(|| format!("loading merge config {}", path.display()))?,
        None => MergeConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.merge_threshold = threshold;
    }
    if let Some(cutoff) = args.cutoff {
        config.retrieval_cutoff = cutoff;
    }
    if let Some(limit) = args.limit {
        config.candidate_limit = limit;
    }
    config.validate()?;
    Ok(config)
}

pub fn run_merge(args: &MergeArgs) -> Result<MergeReport> {
    let config = resolve_config(args)?;
    let defaults = IngestDefaults {
        category: args.category.clone(),
        source: args.source.clone(),
    };
    let incoming = load_incoming(&args.input, args.format, &defaults)
        .with_context(|| format!("reading incoming batch {}", args.input.display()))?;
    let existing = load_corpus(&args.corpus)
        .with_context(|| format!("loading corpus {}", args.corpus.display()))?;

    let parsed = incoming.len();
    let existing_len = existing.len();
    let outcome = merge(incoming, existing, &config);

    let backup = if args.dry_run {
        tracing::info!(corpus = %args.corpus.display(), records = outcome.records.len(), "dry run, nothing written");
        None
    } else {
        save_corpus(&args.corpus, &outcome.records)
            .with_context(|| format!("writing corpus {}", args.corpus.display()))?
            .backup
    };

    Ok(MergeReport {
        parsed,
        existing: existing_len,
        added: outcome.added,
        merged: outcome.merged,
        skipped: outcome.skipped,
        records: outcome.records.len(),
        backup,
        saved: !args.dry_run,
    })
}

pub fn run_stats(corpus: &std::path::Path) -> Result<StatsReport> {
    let records = load_corpus(corpus).with_context(|| format!("loading corpus {}", corpus.display()))?;
    let corpus = Corpus::from_records(records);
    Ok(StatsReport {
        records: corpus.len(),
        total_count: corpus.total_count(),
        distinct_keys: corpus.distinct_keys(),
        shadowed_duplicates: corpus.shadowed_duplicates(),
    })
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Merge(args) => {
            let report = run_merge(&args)?;
            println!("Parsed {} new items", report.parsed);
            println!("Existing items: {}", report.existing);
            println!("Added: {}, merged (count increments): {}", report.added, report.merged);
            if report.skipped > 0 {
                println!("Skipped (no text): {}", report.skipped);
            }
            match (report.saved, &report.backup) {
                (false, _) => println!("Dry run: {} not written", args.corpus.display()),
                (true, Some(backup)) => println!(
                    "Wrote merged dataset to {} (backup at {})",
                    args.corpus.display(),
                    backup.display()
                ),
                (true, None) => println!("Wrote merged dataset to {}", args.corpus.display()),
            }
        }
        Command::Normalize { texts } => {
            for text in texts {
                println!("{}", normalize(&text));
            }
        }
        Command::Stats { corpus } => {
            let stats = run_stats(&corpus)?;
            println!("Records: {}", stats.records);
            println!("Total occurrences: {}", stats.total_count);
            println!("Distinct keys: {}", stats.distinct_keys);
            println!("Records shadowed by a later duplicate key: {}", stats.shadowed_duplicates);
        }
    }
    Ok(())
}
