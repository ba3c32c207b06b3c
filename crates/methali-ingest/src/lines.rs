//! Line-oriented parsers.

use regex::Regex;
use serde_json::Map;
use std::sync::LazyLock;

use methali_core::{Record, StoredRecord};

use crate::incoming::IngestDefaults;

static RE_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s+").unwrap());
static RE_PERIOD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.\s+").unwrap());
static RE_DASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s[-\u{2014}\u{2013}]\s").unwrap());

/// Column separator of the scraper's text export.
pub const FIELD_DELIMITER: &str = "|||";

/// Split `line` into `(quote, translation)`.
///
/// Tries, in order, the first comma + space, the first period + space and a
/// spaced dash. Without any of them the whole line is the quote. Trailing
/// periods are dropped from the quote. Blank lines and lines with nothing
/// before the separator give `None`.
pub fn split_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (quote, translation) = [&*RE_COMMA, &*RE_PERIOD, &*RE_DASH]
        .into_iter()
        .find_map(|re| {
            let mut parts = re.splitn(line, 2);
            let left = parts.next()?;
            let right = parts.next()?;
            Some((left.trim().trim_end_matches('.'), right.trim()))
        })
        .unwrap_or((line, ""));
    if quote.is_empty() {
        return None;
    }
    Some((quote.to_string(), translation.to_string()))
}

fn stored(quote: String, translation: String, person: String, category: String, source: Option<String>) -> Record {
    Record::from(StoredRecord {
        quote,
        translation: Some(translation),
        person: Some(person),
        category: Some(category),
        source,
        count: Some(1),
        extra: Map::new(),
    })
}

/// One record per non-blank line, translation split off with [`split_line`].
pub fn parse_translated_lines(text: &str, defaults: &IngestDefaults) -> Vec<Record> {
    let mut records = Vec::new();
    for (n, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match split_line(line) {
            Some((quote, translation)) => records.push(stored(
                quote,
                translation,
                String::new(),
                defaults.category.clone(),
                defaults.source.clone(),
            )),
            None => tracing::debug!(line = n + 1, "no quote on line"),
        }
    }
    records
}

/// One record per `quote|||person|||category` row; missing columns are empty.
///
/// A non-empty `defaults.category` fills rows without one.
pub fn parse_delimited_lines(text: &str, defaults: &IngestDefaults) -> Vec<Record> {
    let mut records = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let mut cols = line.splitn(3, FIELD_DELIMITER).map(str::trim);
        let quote = cols.next().unwrap_or_default();
        if quote.is_empty() {
            if !line.trim().is_empty() {
                tracing::debug!(line = n + 1, "row without quote");
            }
            continue;
        }
        let person = cols.next().unwrap_or_default();
        let category = match cols.next().unwrap_or_default() {
            "" => defaults.category.as_str(),
            c => c,
        };
        records.push(stored(
            quote.to_string(),
            String::new(),
            person.to_string(),
            category.to_string(),
            defaults.source.clone(),
        ));
    }
    records
}
