//! Candidate retrieval: narrow the corpus down before scoring.

use methali_core::MergeConfig;

use crate::ngram::NGramIndex;

/// Where a candidate list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalSource {
    /// Keys sharing at least one n-gram with the query.
    Index,
    /// Index had nothing; every key of roughly the query's length.
    LengthBucket,
}

#[derive(Debug, Clone)]
pub struct Retrieval<'k> {
    pub keys: Vec<&'k str>,
    pub source: RetrievalSource,
}

impl Retrieval<'_> {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Candidates for `query` from the index, falling back to a length-bucketed
/// scan of `all_keys` when no n-gram is shared.
///
/// The fallback bounds work for very short queries; it does not promise the
/// closest key is included.
pub fn retrieve<'k, I>(
    query: &str,
    index: &'k NGramIndex,
    all_keys: I,
    config: &MergeConfig,
) -> Retrieval<'k>
where
    I: IntoIterator<Item = &'k str>,
{
    let ranked = index.candidates_for(query, config.candidate_limit);
    if !ranked.is_empty() {
        return Retrieval {
            keys: ranked.into_iter().map(|c| c.key).collect(),
            source: RetrievalSource::Index,
        };
    }

    let query_len = query.chars().count();
    let slack = config.length_slack(query_len);
    let keys = all_keys
        .into_iter()
        .filter(|k| k.chars().count().abs_diff(query_len) <= slack)
        .collect();
    Retrieval { keys, source: RetrievalSource::LengthBucket }
}
