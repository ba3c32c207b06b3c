use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MethaliError, Result};

/// Tuning knobs for a merge run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Width of the character n-grams used for candidate retrieval.
    pub ngram_width: usize,
    /// Maximum number of candidates scored per incoming record.
    pub candidate_limit: usize,
    /// Minimum ratio for a candidate to count as a match at all.
    pub retrieval_cutoff: f64,
    /// Minimum ratio for a matched candidate to be merged into.
    pub merge_threshold: f64,
    /// Length-bucket fallback accepts keys within `max(length_slack_min, len * length_slack_ratio)`.
    pub length_slack_min: usize,
    pub length_slack_ratio: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            ngram_width: 3,
            candidate_limit: 30,
            retrieval_cutoff: 0.75,
            merge_threshold: 0.92,
            length_slack_min: 3,
            length_slack_ratio: 0.2,
        }
    }
}

impl MergeConfig {
    /// Read a TOML config file. Missing keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| MethaliError::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ngram_width == 0 {
            return Err(MethaliError::InvalidConfig("ngram_width must be at least 1".into()));
        }
        if self.candidate_limit == 0 {
            return Err(MethaliError::InvalidConfig("candidate_limit must be at least 1".into()));
        }
        for (name, value) in [
            ("retrieval_cutoff", self.retrieval_cutoff),
            ("merge_threshold", self.merge_threshold),
            ("length_slack_ratio", self.length_slack_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MethaliError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.merge_threshold < self.retrieval_cutoff {
            tracing::warn!(
                merge_threshold = self.merge_threshold,
                retrieval_cutoff = self.retrieval_cutoff,
                "merge threshold is below the retrieval cutoff; the cutoff becomes the effective threshold"
            );
        }
        Ok(())
    }

    /// Largest length difference the fallback scan tolerates for a query of `query_len` chars.
    pub fn length_slack(&self, query_len: usize) -> usize {
        let proportional = (query_len as f64 * self.length_slack_ratio) as usize;
        self.length_slack_min.max(proportional)
    }
}
