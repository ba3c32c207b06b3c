//! Corpus persistence: JSON load with defaults, atomic save behind a backup.

pub mod backup;
pub mod corpus_file;

pub use backup::{backup_path, write_atomic};
pub use corpus_file::{load_corpus, parse_records, save_corpus, save_corpus_at, SaveReport};
