//! Error types for bridge database loading.

use thiserror::Error;

/// Errors that can occur while loading a bridge identity database.
#[derive(Debug, Error)]
pub enum BridgeDbError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension maps to no supported format.
    #[error("unsupported bridge db format: {0}")]
    UnsupportedFormat(String),
}

/// Convenience alias for results with [`BridgeDbError`].
pub type Result<T> = std::result::Result<T, BridgeDbError>;
