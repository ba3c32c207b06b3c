//! Ordered record array paired with its canonical-key map.

use std::collections::HashMap;

use methali_core::Record;

use crate::normalizer::normalize;

/// Records in insertion order plus `key -> slot` for exact lookups.
///
/// Both halves change only through [`Corpus::push`] and [`Corpus::absorb`],
/// so every mapped slot holds a record whose quote normalizes to its key.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<Record>,
    key_map: HashMap<String, usize>,
    /// Distinct keys in first-seen order.
    keys: Vec<String>,
    shadowed: usize,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an existing corpus without reordering or folding it.
    ///
    /// When several records share a key the last one owns it; earlier ones
    /// stay in place but are unreachable by lookup.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut key_map = HashMap::with_capacity(records.len());
        let mut keys = Vec::with_capacity(records.len());
        let mut shadowed = 0;
        for (idx, record) in records.iter().enumerate() {
            let key = normalize(&record.quote);
            if key.is_empty() {
                continue;
            }
            if let Some(previous) = key_map.insert(key.clone(), idx) {
                tracing::warn!(index = idx, previous, key = %key, "existing corpus already holds this key");
                shadowed += 1;
                continue;
            }
            keys.push(key);
        }
        Self { records, key_map, keys, shadowed }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct non-empty keys.
    pub fn distinct_keys(&self) -> usize {
        self.keys.len()
    }

    /// Records whose key was taken over by a later record.
    pub fn shadowed_duplicates(&self) -> usize {
        self.shadowed
    }

    /// Slot owning `key`, if any.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.key_map.get(key).copied()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct keys in the order they entered the corpus.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }

    /// Sum of occurrence counts.
    pub fn total_count(&self) -> u64 {
        self.records.iter().map(|r| r.count).sum()
    }

    /// Fold `incoming` into slot `idx`. Returns false for an out-of-range slot.
    pub fn absorb(&mut self, idx: usize, incoming: &Record) -> bool {
        match self.records.get_mut(idx) {
            Some(existing) => {
                existing.absorb(incoming.count, &incoming.translation);
                true
            }
            None => false,
        }
    }

    /// Append `record` under `key`. `key` must be `normalize(&record.quote)`,
    /// non-empty and not yet mapped.
    pub(crate) fn push(&mut self, key: String, mut record: Record) -> usize {
        debug_assert_eq!(normalize(&record.quote), key);
        debug_assert!(!key.is_empty() && !self.key_map.contains_key(&key));
        record.count = record.count.max(1);
        let idx = self.records.len();
        self.records.push(record);
        self.key_map.insert(key.clone(), idx);
        self.keys.push(key);
        idx
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
