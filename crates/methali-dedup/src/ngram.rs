//! Inverted index from character n-grams to canonical keys.

use std::collections::{HashMap, HashSet};

/// Stands in for spaces so word boundaries show up inside n-grams.
pub const WORD_SENTINEL: char = '_';

pub type KeyId = u32;

/// All contiguous `width`-char windows of `key`, spaces replaced by [`WORD_SENTINEL`].
///
/// Keys shorter than `width` produce nothing.
pub fn ngrams(key: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let chars: Vec<char> = key
        .chars()
        .map(|c| if c == ' ' { WORD_SENTINEL } else { c })
        .collect();
    chars.windows(width).map(|w| w.iter().collect()).collect()
}

/// Distinct n-grams of `key`.
pub fn ngram_set(key: &str, width: usize) -> HashSet<String> {
    ngrams(key, width).into_iter().collect()
}

/// A key surfaced by the index with the number of n-grams it shares with the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub key: &'a str,
    pub shared: usize,
}

/// Grow-only posting lists. Keys are interned once and referenced by id.
#[derive(Debug, Clone)]
pub struct NGramIndex {
    width: usize,
    keys: Vec<String>,
    ids: HashMap<String, KeyId>,
    postings: HashMap<String, Vec<KeyId>>,
}

impl NGramIndex {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            keys: Vec::new(),
            ids: HashMap::new(),
            postings: HashMap::new(),
        }
    }

    /// Index every key in `keys`.
    pub fn build<'a, I>(keys: I, width: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = Self::new(width);
        for key in keys {
            index.insert(key);
        }
        index
    }

    /// Number of distinct keys inserted.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of distinct n-grams with a posting list.
    pub fn gram_count(&self) -> usize {
        self.postings.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.ids.contains_key(key)
    }

    /// Add `key` to the posting list of each of its n-grams.
    ///
    /// Returns false for empty or already indexed keys, which are left untouched.
    pub fn insert(&mut self, key: &str) -> bool {
        if key.is_empty() || self.ids.contains_key(key) {
            return false;
        }
        let id = self.keys.len() as KeyId;
        self.keys.push(key.to_string());
        self.ids.insert(key.to_string(), id);
        for gram in ngram_set(key, self.width) {
            self.postings.entry(gram).or_default().push(id);
        }
        true
    }

    /// Up to `limit` keys sharing n-grams with `query`, most shared first.
    ///
    /// Ties are ordered lexicographically by key so results are reproducible.
    pub fn candidates_for(&self, query: &str, limit: usize) -> Vec<Candidate<'_>> {
        let mut shared: HashMap<KeyId, usize> = HashMap::new();
        for gram in ngram_set(query, self.width) {
            if let Some(ids) = self.postings.get(&gram) {
                for &id in ids {
                    *shared.entry(id).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<Candidate<'_>> = shared
            .into_iter()
            .map(|(id, shared)| Candidate { key: self.keys[id as usize].as_str(), shared })
            .collect();
        ranked.sort_unstable_by(|a, b| b.shared.cmp(&a.shared).then_with(|| a.key.cmp(b.key)));
        ranked.truncate(limit);
        ranked
    }
}

impl Default for NGramIndex {
    fn default() -> Self {
        Self::new(3)
    }
}
