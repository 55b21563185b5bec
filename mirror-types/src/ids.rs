//! Identifiers assigned by the remote relay.
//!
//! The remote numbers buffers, nick groups and nicks independently. Each
//! space gets its own newtype so a group id can never be used to look up a
//! nick (or a buffer). Missing ids decode as `-1`, which is never valid.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a buffer on the remote.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BufferId(i64);

impl BufferId {
    /// Create a BufferId from the raw remote value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw remote value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Negative ids mean "absent" and never address a buffer.
    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BufferId({})", self.0)
    }
}

/// Identifier of a nick group on the remote.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(i64);

impl GroupId {
    /// Create a GroupId from the raw remote value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw remote value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Negative ids mean "absent"; as a parent they denote the nicklist root.
    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", self.0)
    }
}

/// Identifier of a nick on the remote.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NickId(i64);

impl NickId {
    /// Create a NickId from the raw remote value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw remote value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Negative ids mean "absent".
    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for NickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NickId({})", self.0)
    }
}
