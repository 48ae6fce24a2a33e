//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown breakpoint: {0}")]
    UnknownBreakpoint(String),
}
