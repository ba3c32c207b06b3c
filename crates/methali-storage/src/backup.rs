//! Backup naming and atomic file replacement.

use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string())
}

/// First free backup name next to `path`.
///
/// `quotes.json.bak` if free, else `quotes.json.bak.<UTC stamp>`, else the
/// stamped name with a `-N` counter. An existing backup is never chosen.
pub fn backup_path(path: &Path, now: DateTime<Utc>) -> PathBuf {
    let name = file_name(path);
    let primary = path.with_file_name(format!("{name}.bak"));
    if !primary.exists() {
        return primary;
    }

    let stamp = now.format("%Y%m%dT%H%M%SZ");
    let stamped = path.with_file_name(format!("{name}.bak.{stamp}"));
    if !stamped.exists() {
        return stamped;
    }

    let mut n = 1u32;
    loop {
        let candidate = path.with_file_name(format!("{name}.bak.{stamp}-{n}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Write through a sibling temp file and rename over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp_path = path.with_file_name(format!("{}.tmp", file_name(path)));
    let result = (|| -> std::io::Result<()> {
        let mut f = fs::File::create(&tmp_path)?;
        f.write_all(bytes)?;
        f.flush()?;
        f.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
