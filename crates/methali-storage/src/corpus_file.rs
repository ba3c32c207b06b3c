//! Loading and saving the corpus JSON array.

use chrono::{DateTime, Utc};
use methali_core::{MethaliError, Record, Result, StoredRecord};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::backup::{backup_path, write_atomic};

/// Where a save put things.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    /// Previous corpus, renamed aside. `None` when there was nothing to keep.
    pub backup: Option<PathBuf>,
    pub records: usize,
}

/// Parse a JSON array of records, applying load-time defaults.
///
/// Any structural problem fails the whole parse; nothing is partially loaded.
pub fn parse_records(text: &str, origin: &Path) -> Result<Vec<Record>> {
    let stored: Vec<StoredRecord> = serde_json::from_str(text).map_err(|source| MethaliError::Malformed {
        path: origin.to_path_buf(),
        source,
    })?;
    Ok(stored.into_iter().map(Record::from).collect())
}

/// Load the corpus at `path`. A missing file is an empty corpus.
pub fn load_corpus(path: &Path) -> Result<Vec<Record>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "corpus not found, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let records = parse_records(&text, path)?;
    tracing::info!(path = %path.display(), records = records.len(), "corpus loaded");
    Ok(records)
}

/// Save `records` to `path`, first copying any existing file to a fresh backup name.
///
/// The previous corpus stays at `path` until the new one is renamed over it.
pub fn save_corpus(path: &Path, records: &[Record]) -> Result<SaveReport> {
    save_corpus_at(path, records, Utc::now())
}

/// [`save_corpus`] with an explicit clock for the backup timestamp.
pub fn save_corpus_at(path: &Path, records: &[Record], now: DateTime<Utc>) -> Result<SaveReport> {
    let json = serde_json::to_string_pretty(records)?;

    let backup = if path.exists() {
        let target = backup_path(path, now);
        fs::copy(path, &target)?;
        tracing::info!(backup = %target.display(), "previous corpus kept");
        Some(target)
    } else {
        None
    };

    write_atomic(path, json.as_bytes())?;
    tracing::info!(path = %path.display(), records = records.len(), "corpus written");
    Ok(SaveReport {
        path: path.to_path_buf(),
        backup,
        records: records.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let records = load_corpus(&dir.path().join("quotes.json")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_applies_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        let data = json!([
            {"quote": "Pole pole", "category": "Patience"},
            {"quote": "Haba na haba", "count": 4, "source": "mwambao", "translation": "bit by bit"},
            {"quote": "Asiyefunzwa na mamaye"}
        ]);
        fs::write(&path, data.to_string()).unwrap();

        let records = load_corpus(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].count, 1);
        assert_eq!(records[0].source, "Patience");
        assert_eq!(records[0].translation, "");
        assert_eq!(records[1].count, 4);
        assert_eq!(records[1].source, "mwambao");
        assert_eq!(records[2].source, "unknown");
    }

    #[test]
    fn test_load_malformed_fails_whole_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        fs::write(&path, r#"[{"quote": "ok"}, {"quote": 5}]"#).unwrap();
        assert!(matches!(load_corpus(&path), Err(MethaliError::Malformed { .. })));
    }

    #[test]
    fn test_load_not_an_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        fs::write(&path, r#"{"quote": "Pole"}"#).unwrap();
        let err = load_corpus(&path).unwrap_err();
        assert!(err.to_string().contains("quotes.json"));
    }

    #[test]
    fn test_load_truncated_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        fs::write(&path, r#"[{"quote": "Pole""#).unwrap();
        assert!(matches!(load_corpus(&path), Err(MethaliError::Malformed { .. })));
    }

    #[test]
    fn test_save_without_previous_has_no_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        let report = save_corpus(&path, &[Record::new("Pole pole")]).unwrap();
        assert_eq!(report.backup, None);
        assert_eq!(report.records, 1);
        assert!(path.exists());
    }

    #[test]
    fn test_save_keeps_every_previous_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();

        save_corpus_at(&path, &[Record::new("v1")], now).unwrap();
        let second = save_corpus_at(&path, &[Record::new("v2")], now).unwrap();
        let third = save_corpus_at(&path, &[Record::new("v3")], now).unwrap();
        let fourth = save_corpus_at(&path, &[Record::new("v4")], now).unwrap();

        assert_eq!(second.backup, Some(dir.path().join("quotes.json.bak")));
        assert_eq!(third.backup, Some(dir.path().join("quotes.json.bak.20261014T120000Z")));
        assert_eq!(fourth.backup, Some(dir.path().join("quotes.json.bak.20261014T120000Z-1")));

        let v1 = load_corpus(&dir.path().join("quotes.json.bak")).unwrap();
        assert_eq!(v1[0].quote, "v1");
        let current = load_corpus(&path).unwrap();
        assert_eq!(current[0].quote, "v4");
    }

    #[test]
    fn test_failed_save_leaves_previous_corpus_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        save_corpus(&path, &[Record::new("Pole pole"), Record::new("Haba na haba")]).unwrap();
        fs::create_dir(dir.path().join("quotes.json.tmp")).unwrap();

        assert!(save_corpus(&path, &[Record::new("Haraka haraka")]).is_err());

        let current = load_corpus(&path).unwrap();
        assert_eq!(current.len(), 2);
        assert_eq!(current[0].quote, "Pole pole");
        let backup = load_corpus(&dir.path().join("quotes.json.bak")).unwrap();
        assert_eq!(backup.len(), 2);
    }

    #[test]
    fn test_save_round_trip_preserves_extra_and_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        let mut first = Record::new("Kanga moja ya jirani").with_source("glcom");
        first.extra.insert("common_meaning".into(), json!("envy"));
        let records = vec![first, Record::new("Mbio za sakafuni huishia ukingoni")];

        save_corpus(&path, &records).unwrap();
        let loaded = load_corpus(&path).unwrap();
        assert_eq!(loaded[0].quote, "Kanga moja ya jirani");
        assert_eq!(loaded[0].extra.get("common_meaning"), Some(&json!("envy")));
        assert_eq!(loaded[1].quote, "Mbio za sakafuni huishia ukingoni");
    }

    #[test]
    fn test_save_pretty_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        save_corpus(&path, &[Record::new("Ng\u{2019}ombe")]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Ng\u{2019}ombe"));
        assert!(text.contains("\n    \"quote\""));
    }
}
