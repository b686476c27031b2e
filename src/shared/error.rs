//! Shared Error Types
//!
//! Errors raised by the platform-agnostic types in `shared` while decoding
//! wire payloads. Form validation does not go through here; screens collect
//! per-field messages directly.
//!
//! # Usage
//!
//! ```rust
//! use lgpd_mobile::shared::error::SharedError;
//!
//! let error = SharedError::serialization("missing field `id`");
//! assert!(error.to_string().contains("missing field"));
//! ```
use thiserror::Error;

/// Shared error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
