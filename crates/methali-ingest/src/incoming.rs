//! Reading a batch of incoming records from disk.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use methali_core::{Record, Result};

use crate::lines::{parse_delimited_lines, parse_translated_lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestFormat {
    Lines,
    Delimited,
    Json,
}

impl IngestFormat {
    /// `.json` files are JSON; everything else is read as plain lines.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Lines,
        }
    }
}

impl FromStr for IngestFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lines" | "text" => Ok(Self::Lines),
            "delimited" => Ok(Self::Delimited),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown ingest format: {other} (expected lines, delimited or json)")),
        }
    }
}

impl fmt::Display for IngestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lines => "lines",
            Self::Delimited => "delimited",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Payload for records whose source text does not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestDefaults {
    pub category: String,
    /// `None` falls back to the category, then to `"unknown"`.
    pub source: Option<String>,
}

impl IngestDefaults {
    pub fn new(category: impl Into<String>) -> Self {
        Self { category: category.into(), source: None }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Read incoming records from `path`. Unlike the corpus, a missing input is an error.
pub fn load_incoming(path: &Path, format: Option<IngestFormat>, defaults: &IngestDefaults) -> Result<Vec<Record>> {
    let format = format.unwrap_or_else(|| IngestFormat::from_path(path));
    let text = std::fs::read_to_string(path)?;
    let records = match format {
        IngestFormat::Json => methali_storage::parse_records(&text, path)?,
        IngestFormat::Lines => parse_translated_lines(&text, defaults),
        IngestFormat::Delimited => parse_delimited_lines(&text, defaults),
    };
    tracing::info!(path = %path.display(), %format, records = records.len(), "incoming batch parsed");
    Ok(records)
}
