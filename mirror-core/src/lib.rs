//! # mirror-core
//!
//! Pure reconciliation logic for mirroring a remote relay (no I/O, instant tests).
//!
//! This crate turns the JSON events pushed by a remote relay into mutations
//! of a local mirror: buffers, their lines, and their nicklist trees. The
//! local side is reached only through the [`BufferStore`] and
//! [`NicklistStore`] capability traits, so the same logic drives a real host
//! or the in-memory [`MemoryStore`].
//!
//! ## Design Philosophy
//!
//! The dispatcher never performs I/O. Each call to [`Dispatcher::recv`]
//! applies one message to the store and returns the [`Action`]s the caller
//! must carry out (send a request upstream, print a status line). This
//! enables:
//! - Instant unit tests (no transport, no async)
//! - Deterministic behavior (same store + same message = same result)
//! - A visible bound on outbound traffic per message
//!
//! The actual I/O is performed by `mirror-client`, which interprets the
//! actions produced here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod outbound;
pub mod remote;
pub mod store;
pub mod time;

pub use action::Action;
pub use config::MirrorConfig;
pub use dispatch::Dispatcher;
pub use error::{DispatchError, HandlerError};
pub use outbound::{input_request, stamped_buffer_id};
pub use remote::Remote;
pub use store::memory::{BufferHandle, GroupHandle, MemoryStore, MirroredBuffer, NickHandle, Nicklist};
pub use store::{
    BufferProperty, BufferProps, BufferStore, GroupProperty, InputBinding, LinePosition, NewGroup,
    NewNick, NickProperty, NicklistStore, RenderedLine,
};
pub use time::Timestamp;
