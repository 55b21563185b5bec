//! # mirror-types
//!
//! Wire format types for the remote relay mirror.
//!
//! This crate provides the foundational types used across all relay-mirror crates:
//! - [`BufferId`], [`GroupId`], [`NickId`] - Remote-assigned identifiers
//! - [`Envelope`] - Inbound message wrapper with routing metadata
//! - [`BufferBody`], [`LineBody`], [`NickGroupBody`], [`NickBody`], [`VersionBody`] - Body payloads
//! - [`Request`] - Outbound requests (input, sync)
//! - [`WireError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod access;
mod envelope;
mod error;
mod ids;
mod messages;

pub use envelope::{
    BodyType, Envelope, PushEvent, EVENT_NICKLIST_GROUP_REMOVING, EVENT_NICKLIST_NICK_REMOVING,
};
pub use error::WireError;
pub use ids::{BufferId, GroupId, NickId};
pub use messages::{
    BufferBody, InputRequest, KeyBinding, LineBody, NickBody, NickGroupBody, Request, SyncRequest,
    VersionBody,
};
