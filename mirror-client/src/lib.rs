//! # mirror-client
//!
//! Async session mirroring a remote relay into a local store.
//!
//! The reconciliation logic lives in mirror-core and never performs I/O.
//! This crate adds the moving parts around it:
//!
//! - **Transport Abstraction**: pluggable text transport (mock included)
//! - **Session Loop**: receive, dispatch, send, until the connection closes
//! - **Input Relay**: text typed in a mirrored buffer goes back upstream
//!
//! ## Example
//!
//! ```ignore
//! use relay_mirror_client::{MockTransport, RemoteSession};
//! use relay_mirror_core::{MemoryStore, MirrorConfig};
//!
//! let session = RemoteSession::new(
//!     "home",
//!     "wss://relay.example:9000/api",
//!     MirrorConfig::default(),
//!     MockTransport::new(),
//!     MemoryStore::new(),
//! );
//! session.connect().await?;
//! let summary = session.run().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod session;
pub mod transport;

pub use session::{ClientError, RemoteSession, RunSummary};
pub use transport::{MockTransport, Transport, TransportError};
