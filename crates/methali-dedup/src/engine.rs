//! Merge engine: fold an ingest batch into the corpus, one record at a time.

use methali_core::{MergeConfig, Record};

use crate::corpus::Corpus;
use crate::ngram::NGramIndex;
use crate::normalizer::normalize;
use crate::retriever::retrieve;
use crate::scorer::SimilarityScorer;

/// How an incoming record found its existing twin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    Exact,
    Fuzzy { ratio: f64 },
}

/// What happened to one incoming record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MergeDecision {
    /// Quote has no content after normalization.
    Skipped,
    Added { index: usize },
    Merged { index: usize, kind: MatchKind },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub merged: usize,
    pub skipped: usize,
}

impl MergeSummary {
    fn record(&mut self, decision: &MergeDecision) {
        match decision {
            MergeDecision::Skipped => self.skipped += 1,
            MergeDecision::Added { .. } => self.added += 1,
            MergeDecision::Merged { .. } => self.merged += 1,
        }
    }
}

/// Final corpus of a merge run with its counters.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub records: Vec<Record>,
    pub added: usize,
    pub merged: usize,
    pub skipped: usize,
}

/// Owns the corpus, its key map and the n-gram index for one batch.
///
/// Records are processed strictly in order, so a record added earlier in the
/// batch is a merge target for later ones.
pub struct MergeEngine {
    corpus: Corpus,
    index: NGramIndex,
    scorer: SimilarityScorer,
    config: MergeConfig,
    summary: MergeSummary,
}

impl MergeEngine {
    pub fn new(existing: Vec<Record>, config: MergeConfig) -> Self {
        let corpus = Corpus::from_records(existing);
        let index = NGramIndex::build(corpus.keys(), config.ngram_width);
        tracing::debug!(
            records = corpus.len(),
            keys = corpus.distinct_keys(),
            grams = index.gram_count(),
            "merge engine ready"
        );
        Self {
            corpus,
            index,
            scorer: SimilarityScorer::new(config.retrieval_cutoff),
            config,
            summary: MergeSummary::default(),
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn index(&self) -> &NGramIndex {
        &self.index
    }

    pub fn summary(&self) -> MergeSummary {
        self.summary
    }

    /// Merge one record: exact key hit, else best fuzzy match at or above the
    /// merge threshold, else append.
    pub fn merge_record(&mut self, record: Record) -> MergeDecision {
        let decision = self.decide_and_apply(record);
        self.summary.record(&decision);
        decision
    }

    /// Merge every record of `items` in order.
    pub fn merge_all<I>(&mut self, items: I) -> MergeSummary
    where
        I: IntoIterator<Item = Record>,
    {
        for record in items {
            self.merge_record(record);
        }
        self.summary
    }

    pub fn finish(self) -> MergeOutcome {
        tracing::info!(
            added = self.summary.added,
            merged = self.summary.merged,
            skipped = self.summary.skipped,
            records = self.corpus.len(),
            "merge finished"
        );
        MergeOutcome {
            records: self.corpus.into_records(),
            added: self.summary.added,
            merged: self.summary.merged,
            skipped: self.summary.skipped,
        }
    }

    fn decide_and_apply(&mut self, record: Record) -> MergeDecision {
        let key = normalize(&record.quote);
        if key.is_empty() {
            tracing::debug!(quote = %record.quote, "skipping record without content");
            return MergeDecision::Skipped;
        }

        if let Some(index) = self.corpus.get(&key) {
            let absorbed = self.corpus.absorb(index, &record);
            debug_assert!(absorbed);
            tracing::debug!(index, key = %key, "exact duplicate");
            return MergeDecision::Merged { index, kind: MatchKind::Exact };
        }

        if let Some((index, ratio)) = self.fuzzy_target(&key) {
            let absorbed = self.corpus.absorb(index, &record);
            debug_assert!(absorbed);
            tracing::debug!(index, ratio, key = %key, "near duplicate");
            return MergeDecision::Merged { index, kind: MatchKind::Fuzzy { ratio } };
        }

        self.index.insert(&key);
        let index = self.corpus.push(key, record);
        MergeDecision::Added { index }
    }

    /// Slot and ratio of the best match, when it clears the merge threshold.
    ///
    /// Only the single best candidate is considered; if it falls short there
    /// is no second try.
    fn fuzzy_target(&self, key: &str) -> Option<(usize, f64)> {
        let retrieval = retrieve(key, &self.index, self.corpus.keys(), &self.config);
        let best = self.scorer.best_match(key, &retrieval.keys)?;
        if best.ratio < self.config.merge_threshold {
            tracing::debug!(key, candidate = best.key, ratio = best.ratio, "best match below merge threshold");
            return None;
        }
        self.corpus.get(best.key).map(|index| (index, best.ratio))
    }
}

/// Fold `new_items` into `existing` and return the merged corpus with counts.
pub fn merge<I>(new_items: I, existing: Vec<Record>, config: &MergeConfig) -> MergeOutcome
where
    I: IntoIterator<Item = Record>,
{
    let mut engine = MergeEngine::new(existing, config.clone());
    engine.merge_all(new_items);
    engine.finish()
}
