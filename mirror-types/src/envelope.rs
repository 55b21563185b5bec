//! Envelope - the outer wrapper of every message pushed by the remote.

use serde_json::Value;

use crate::access::ObjectExt;
use crate::{BufferId, WireError};

/// Event name announcing that a nick group is being removed.
pub const EVENT_NICKLIST_GROUP_REMOVING: &str = "nicklist_group_removing";

/// Event name announcing that a nick is being removed.
pub const EVENT_NICKLIST_NICK_REMOVING: &str = "nicklist_nick_removing";

/// Body type discriminator for handler routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyType {
    /// Buffer snapshot
    Buffer,
    /// One displayed line
    Line,
    /// Nick group subtree
    NickGroup,
    /// Single nick
    Nick,
    /// Remote version information
    Version,
}

impl BodyType {
    /// Look up a body type by its wire tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "buffer" => Some(Self::Buffer),
            "line" => Some(Self::Line),
            "nick_group" => Some(Self::NickGroup),
            "nick" => Some(Self::Nick),
            "version" => Some(Self::Version),
            _ => None,
        }
    }

    /// The wire tag for this body type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buffer => "buffer",
            Self::Line => "line",
            Self::NickGroup => "nick_group",
            Self::Nick => "nick",
            Self::Version => "version",
        }
    }
}

/// Push event metadata: what happened and on which remote buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    /// Event name (e.g. `buffer_line_added`)
    pub name: Option<String>,
    /// Remote buffer the event applies to (`-1` when absent)
    pub buffer_id: BufferId,
}

impl PushEvent {
    /// True if this event announces removal of a nick group.
    pub fn is_group_removal(&self) -> bool {
        self.name.as_deref() == Some(EVENT_NICKLIST_GROUP_REMOVING)
    }

    /// True if this event announces removal of a nick.
    pub fn is_nick_removal(&self) -> bool {
        self.name.as_deref() == Some(EVENT_NICKLIST_NICK_REMOVING)
    }
}

/// One inbound message from the remote.
///
/// Built per message and discarded after dispatch. Only the top level must
/// be a JSON object; every field is optional and defaults leniently.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Response code (`-1` for pure push events)
    pub code: i64,
    /// Raw body type tag, kept as sent so unknown tags can be reported
    pub body_type: Option<String>,
    /// Push event metadata, if this is a push
    pub event: Option<PushEvent>,
    /// Body: an object, an array of objects, or absent
    pub body: Option<Value>,
}

impl Envelope {
    /// Parse an envelope from decoded text.
    pub fn parse(data: &str) -> Result<Self, WireError> {
        let value: Value = serde_json::from_str(data).map_err(WireError::InvalidJson)?;
        Self::from_value(value)
    }

    /// Build an envelope from an already decoded value.
    pub fn from_value(value: Value) -> Result<Self, WireError> {
        let Value::Object(mut obj) = value else {
            return Err(WireError::NotAnObject { what: "envelope" });
        };

        let code = obj.int_or("code", -1);
        let body_type = obj.str_field("body_type").map(str::to_owned);
        let event = obj.object_field("event").map(|event| PushEvent {
            name: event.str_field("name").map(str::to_owned),
            buffer_id: BufferId::new(event.int_or("buffer_id", -1)),
        });
        let body = obj.remove("body");

        Ok(Self {
            code,
            body_type,
            event,
            body,
        })
    }

    /// True for the codes that may legitimately carry no body type.
    pub fn is_empty_success(&self) -> bool {
        self.code == 200 || self.code == 204
    }

    /// Resolved body type, `None` if absent or unknown.
    pub fn kind(&self) -> Option<BodyType> {
        self.body_type.as_deref().and_then(BodyType::from_tag)
    }

    /// Body elements to hand to a handler, in order.
    ///
    /// An array body yields each element; anything else yields the body
    /// itself exactly once (possibly `None`).
    pub fn bodies(&self) -> Vec<Option<&Value>> {
        match &self.body {
            Some(Value::Array(items)) => items.iter().map(Some).collect(),
            other => vec![other.as_ref()],
        }
    }
}
