//! Decode errors for wire payloads.

use thiserror::Error;

/// Errors produced while decoding wire payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A card code was not `BACK` or a rank/suit pair like `AS` or `TH`.
    #[error("malformed card code `{0}`")]
    BadCard(String),

    /// A JSON payload did not match the expected shape.
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
