//! Error types for mirror-core.

use relay_mirror_types::WireError;

/// Errors reported for a whole inbound message.
///
/// Neither variant ends the remote session: the message is dropped and the
/// next one is processed normally.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The envelope could not be read, or carries no body type with an
    /// unexpected code.
    #[error("remote[{remote}]: invalid data received from remote ({reason}): \"{payload}\"")]
    MalformedData {
        /// Remote name.
        remote: String,
        /// What was wrong with the envelope.
        reason: String,
        /// Raw message as received.
        payload: String,
    },

    /// A body handler reported a fatal outcome.
    #[error("remote[{remote}]: callback failed for body type \"{body_type}\": \"{payload}\"")]
    CallbackFailed {
        /// Remote name.
        remote: String,
        /// Body type being handled.
        body_type: &'static str,
        /// Raw message as received.
        payload: String,
        /// What the handler tripped on.
        source: HandlerError,
    },
}

/// Fatal outcome of a body handler.
///
/// Returning it stops the rest of the message. The built-in handlers read
/// every body element leniently and never return it.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// A body element could not be read.
    #[error("invalid body: {0}")]
    InvalidBody(#[from] WireError),
}

/// Result type alias for dispatch.
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

/// Result type alias for body handlers.
pub type HandlerResult = std::result::Result<(), HandlerError>;
