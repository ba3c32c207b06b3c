//! Corpus record shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Source label used when a record carries neither a source nor a category.
pub const UNKNOWN_SOURCE: &str = "unknown";

fn default_count() -> u64 {
    1
}

/// One proverb entry. `quote` is the identity field, everything else is payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub quote: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub person: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub source: String,
    /// Number of times this proverb has been seen across ingests.
    #[serde(default = "default_count")]
    pub count: u64,
    /// Fields this crate does not interpret, kept so a load/save cycle is lossless.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn new(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            translation: String::new(),
            person: String::new(),
            category: String::new(),
            source: String::new(),
            count: 1,
            extra: Map::new(),
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = translation.into();
        self
    }

    pub fn with_person(mut self, person: impl Into<String>) -> Self {
        self.person = person.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count.max(1);
        self
    }

    /// Fold another sighting of the same proverb into this record.
    ///
    /// The occurrence count grows by `other_count` and a translation is only
    /// taken over when this record has none.
    pub fn absorb(&mut self, other_count: u64, other_translation: &str) {
        self.count = self.count.saturating_add(other_count.max(1));
        if self.translation.is_empty() && !other_translation.is_empty() {
            self.translation = other_translation.to_string();
        }
    }
}

/// Record as it appears on disk, before load-time defaults are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredRecord {
    pub quote: String,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub person: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<StoredRecord> for Record {
    fn from(stored: StoredRecord) -> Self {
        let category = stored.category.unwrap_or_default();
        let source = match stored.source {
            Some(source) => source,
            None if !category.is_empty() => category.clone(),
            None => UNKNOWN_SOURCE.to_string(),
        };
        let count = match stored.count {
            Some(0) => {
                tracing::warn!(quote = %stored.quote, "stored count of 0 raised to 1");
                1
            }
            Some(n) => n,
            None => 1,
        };
        Self {
            quote: stored.quote,
            translation: stored.translation.unwrap_or_default(),
            person: stored.person.unwrap_or_default(),
            category,
            source,
            count,
            extra: stored.extra,
        }
    }
}
