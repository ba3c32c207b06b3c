//! Methali dedup: fold newly ingested proverbs into an existing corpus.
//!
//! Stages, per incoming record:
//! 1. Normalizer: canonical comparison key
//! 2. Exact match against the corpus key map
//! 3. CandidateRetriever: n-gram index lookup, length-bucket fallback
//! 4. SimilarityScorer: block-matching ratio over the candidates
//! 5. MergeEngine: merge into the best match or append

pub mod corpus;
pub mod engine;
pub mod ngram;
pub mod normalizer;
pub mod retriever;
pub mod scorer;

pub use corpus::Corpus;
pub use engine::{merge, MatchKind, MergeDecision, MergeEngine, MergeOutcome, MergeSummary};
pub use ngram::NGramIndex;
pub use normalizer::normalize;
pub use scorer::{BestMatch, SimilarityScorer};
