//! Actions to be executed by the caller of the dispatcher.
//!
//! These are instructions, not side effects. `mirror-client` interprets
//! them and performs the actual I/O.

use relay_mirror_types::Request;

/// One side effect requested by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send a request to the remote.
    Send(Request),
    /// Show an informational status line to the user.
    Status(String),
}

impl Action {
    /// The request to send, if this is a send action.
    pub fn as_request(&self) -> Option<&Request> {
        match self {
            Self::Send(request) => Some(request),
            Self::Status(_) => None,
        }
    }
}
