//! Error types for the fable_core crate.

use fable_store::TurtleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FableError {
    #[error("Parse error: {0}")]
    Parse(#[from] TurtleError),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FableError>;
