//! Shared types for the methali proverb corpus tools.

pub mod config;
pub mod error;
pub mod types;

pub use config::MergeConfig;
pub use error::{MethaliError, Result};
pub use types::{Record, StoredRecord};
