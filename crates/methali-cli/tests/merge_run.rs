//! End-to-end merge runs against files in a temp directory.

use clap::Parser;
use methali_cli::{resolve_config, run_merge, run_stats, Cli, Command, MergeArgs};
use methali_ingest::IngestFormat;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn args(corpus: &Path, input: &Path) -> MergeArgs {
    MergeArgs {
        corpus: corpus.to_path_buf(),
        input: input.to_path_buf(),
        format: None,
        category: "mwambao".into(),
        source: None,
        config: None,
        threshold: None,
        cutoff: None,
        limit: None,
        dry_run: false,
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_merge_text_batch_into_existing_corpus() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("quotes.json");
    let input = dir.path().join("mwambao_methali.txt");
    fs::write(
        &corpus,
        json!([
            {"quote": "Haraka haraka haina baraka.", "category": "Patience"},
            {"quote": "Akili ni nywele kila mtu ana zake", "translation": "Wisdom is like hair", "count": 3},
            {"quote": "Bandu bandu huisha gogo", "person": "", "category": "Patience", "source": "site"}
        ])
        .to_string(),
    )
    .unwrap();
    fs::write(
        &input,
        "Haraka haraka haina baraka. Hurry hurry has no blessing\n\
         Akili ni nywele kila mtu ana yake. Everyone has their own mind\n\
         \n\
         Usipoziba ufa utajenga ukuta - if you don't fill a crack you build a wall\n",
    )
    .unwrap();

    let report = run_merge(&args(&corpus, &input)).unwrap();
    assert_eq!(report.parsed, 3);
    assert_eq!(report.existing, 3);
    assert_eq!((report.added, report.merged, report.skipped), (1, 2, 0));
    assert_eq!(report.backup, Some(dir.path().join("quotes.json.bak")));

    let merged = read_json(&corpus);
    let rows = merged.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["count"], 2);
    assert_eq!(rows[0]["translation"], "Hurry hurry has no blessing");
    assert_eq!(rows[0]["source"], "Patience");
    assert_eq!(rows[1]["count"], 4);
    assert_eq!(rows[1]["translation"], "Wisdom is like hair");
    assert_eq!(rows[2]["source"], "site");
    assert_eq!(rows[3]["quote"], "Usipoziba ufa utajenga ukuta");
    assert_eq!(rows[3]["source"], "mwambao");

    let original = read_json(&dir.path().join("quotes.json.bak"));
    assert_eq!(original.as_array().unwrap().len(), 3);
}

#[test]
fn test_merge_json_batch_first_run() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("data").join("quotes.json");
    let input = dir.path().join("new.json");
    fs::write(
        &input,
        json!([
            {"quote": "Pole pole ndio mwendo", "translation": "Slowly is the way"},
            {"quote": "pole, pole ndio mwendo!"},
            {"quote": "   "}
        ])
        .to_string(),
    )
    .unwrap();

    let report = run_merge(&args(&corpus, &input)).unwrap();
    assert_eq!((report.added, report.merged, report.skipped), (1, 1, 1));
    assert_eq!(report.backup, None);

    let rows = read_json(&corpus);
    assert_eq!(rows[0]["count"], 2);
    assert_eq!(rows[0]["source"], "unknown");
}

#[test]
fn test_dry_run_leaves_corpus_untouched() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("quotes.json");
    let input = dir.path().join("batch.txt");
    let before = json!([{"quote": "Pole pole"}]).to_string();
    fs::write(&corpus, &before).unwrap();
    fs::write(&input, "Pole pole\nHaba na haba\n").unwrap();

    let mut a = args(&corpus, &input);
    a.dry_run = true;
    let report = run_merge(&a).unwrap();
    assert!(!report.saved);
    assert_eq!((report.added, report.merged), (1, 1));
    assert_eq!(fs::read_to_string(&corpus).unwrap(), before);
    assert!(!dir.path().join("quotes.json.bak").exists());
}

#[test]
fn test_malformed_corpus_aborts_without_writing() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("quotes.json");
    let input = dir.path().join("batch.txt");
    fs::write(&corpus, "{not json").unwrap();
    fs::write(&input, "Pole pole\n").unwrap();

    let err = run_merge(&args(&corpus, &input)).unwrap_err();
    assert!(format!("{err:#}").contains("quotes.json"));
    assert_eq!(fs::read_to_string(&corpus).unwrap(), "{not json");
    assert!(!dir.path().join("quotes.json.bak").exists());
}

#[test]
fn test_delimited_format_flag() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("quotes.json");
    let input = dir.path().join("quotes.txt");
    fs::write(&input, "Haba na haba hujaza kibaba|||Bibi|||Patience\n").unwrap();

    let mut a = args(&corpus, &input);
    a.format = Some(IngestFormat::Delimited);
    run_merge(&a).unwrap();

    let rows = read_json(&corpus);
    assert_eq!(rows[0]["person"], "Bibi");
    assert_eq!(rows[0]["category"], "Patience");
    assert_eq!(rows[0]["translation"], "");
}

#[test]
fn test_config_file_and_overrides() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("merge.toml");
    fs::write(&config, "merge_threshold = 0.97\ncandidate_limit = 10\n").unwrap();

    let mut a = args(&dir.path().join("q.json"), &dir.path().join("in.txt"));
    a.config = Some(config);
    a.limit = Some(5);
    let resolved = resolve_config(&a).unwrap();
    assert!((resolved.merge_threshold - 0.97).abs() < 1e-12);
    assert_eq!(resolved.candidate_limit, 5);

    a.threshold = Some(2.0);
    assert!(resolve_config(&a).is_err());
}

#[test]
fn test_stats_reports_shadowed() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("quotes.json");
    fs::write(
        &corpus,
        json!([{"quote": "Pole pole", "count": 2}, {"quote": "pole pole."}, {"quote": "Haba"}]).to_string(),
    )
    .unwrap();
    let stats = run_stats(&corpus).unwrap();
    assert_eq!(stats.records, 3);
    assert_eq!(stats.total_count, 4);
    assert_eq!(stats.distinct_keys, 2);
    assert_eq!(stats.shadowed_duplicates, 1);
}

#[test]
fn test_cli_parses_merge_flags() {
    let cli = Cli::try_parse_from([
        "methali", "merge", "--input", "new.txt", "--format", "delimited", "--threshold", "0.95", "--dry-run",
    ])
    .unwrap();
    match cli.command {
        Command::Merge(a) => {
            assert_eq!(a.format, Some(IngestFormat::Delimited));
            assert_eq!(a.threshold, Some(0.95));
            assert!(a.dry_run);
            assert_eq!(a.corpus, Path::new("data/quotes.json"));
        }
        other => panic!("unexpected command {other:?}"),
    }
}
