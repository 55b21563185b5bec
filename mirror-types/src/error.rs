//! Error types for the relay wire format.

use thiserror::Error;

/// Errors that can occur while reading or writing relay messages.
#[derive(Debug, Error)]
pub enum WireError {
    /// Inbound text is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// A value that must be a JSON object is something else
    #[error("{what} is not a JSON object")]
    NotAnObject {
        /// What was being read (envelope, buffer body, ...)
        what: &'static str,
    },

    /// Outbound request serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}
