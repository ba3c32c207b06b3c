use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MethaliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed corpus data in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MethaliError>;
