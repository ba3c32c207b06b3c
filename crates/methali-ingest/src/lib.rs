//! Turn raw scraped text into incoming records.
//!
//! Formats:
//! - `lines`: one proverb per line, translation split off by punctuation
//! - `delimited`: `quote|||person|||category` rows
//! - `json`: an array of records in corpus shape

pub mod incoming;
pub mod lines;

pub use incoming::{load_incoming, IngestDefaults, IngestFormat};
pub use lines::{parse_delimited_lines, parse_translated_lines, split_line};
