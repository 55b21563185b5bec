//! Body payloads and outbound requests.
//!
//! Inbound bodies are read leniently through [`ObjectExt`]: a wrong-typed
//! field takes its default, and malformed entries inside arrays (keys,
//! lines, nested groups and nicks) are skipped. Only the body itself has to
//! be an object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::access::ObjectExt;
use crate::{BufferId, GroupId, NickId, WireError};

fn object<'a>(value: &'a Value, what: &'static str) -> Result<&'a Map<String, Value>, WireError> {
    value.as_object().ok_or(WireError::NotAnObject { what })
}

fn owned(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.str_field(key).map(str::to_owned)
}

/// One key binding attached to a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    /// Key name, e.g. `meta-c`
    pub key: String,
    /// Command run when the key is pressed
    pub command: String,
}

impl KeyBinding {
    /// Read a binding; incomplete entries yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            key: owned(obj, "key")?,
            command: owned(obj, "command")?,
        })
    }
}

/// Snapshot of one remote buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferBody {
    /// Remote buffer id
    pub id: BufferId,
    /// Full buffer name on the remote
    pub name: Option<String>,
    /// Short name
    pub short_name: Option<String>,
    /// Buffer number on the remote (`-1` when absent)
    pub number: i64,
    /// Buffer type tag (`formatted`, `free`, ...)
    pub kind: Option<String>,
    /// Title
    pub title: Option<String>,
    /// Nicklist is displayed
    pub nicklist: bool,
    /// Nicks are compared case-sensitively
    pub nicklist_case_sensitive: bool,
    /// Groups are displayed in the nicklist
    pub nicklist_display_groups: bool,
    /// Buffer-local key bindings
    pub keys: Vec<KeyBinding>,
    /// Lines to display, oldest first
    pub lines: Vec<LineBody>,
    /// Root of the nicklist tree
    pub nicklist_root: Option<NickGroupBody>,
}

impl BufferBody {
    /// Read a buffer body; fails only if the body is not an object.
    pub fn from_value(value: &Value) -> Result<Self, WireError> {
        let obj = object(value, "buffer body")?;
        Ok(Self {
            id: BufferId::new(obj.int_or("id", -1)),
            name: owned(obj, "name"),
            short_name: owned(obj, "short_name"),
            number: obj.int_or("number", -1),
            kind: owned(obj, "type"),
            title: owned(obj, "title"),
            nicklist: obj.flag("nicklist"),
            nicklist_case_sensitive: obj.flag("nicklist_case_sensitive"),
            nicklist_display_groups: obj.flag("nicklist_display_groups"),
            keys: obj
                .array_field("keys")
                .iter()
                .filter_map(KeyBinding::from_value)
                .collect(),
            lines: obj
                .array_field("lines")
                .iter()
                .filter_map(Value::as_object)
                .map(LineBody::from_object)
                .collect(),
            nicklist_root: obj.object_field("nicklist_root").map(NickGroupBody::from_object),
        })
    }
}

/// One line of buffer content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBody {
    /// Row for free-content buffers; negative for scrolling content
    pub y: i64,
    /// Date as sent by the remote
    pub date: Option<String>,
    /// Prefix (nick, arrow, ...)
    pub prefix: Option<String>,
    /// Message text
    pub message: Option<String>,
    /// Tags, in order; non-string entries are dropped
    pub tags: Vec<String>,
}

impl LineBody {
    /// Read a line body; fails only if the body is not an object.
    pub fn from_value(value: &Value) -> Result<Self, WireError> {
        object(value, "line body").map(Self::from_object)
    }

    /// Read a line from an object.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            y: obj.int_or("y", -1),
            date: owned(obj, "date"),
            prefix: owned(obj, "prefix"),
            message: owned(obj, "message"),
            tags: obj
                .array_field("tags")
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl Default for LineBody {
    /// The line read from an empty object: scrolling, no text.
    fn default() -> Self {
        Self::from_object(&Map::new())
    }
}

/// A nick group with its nested groups and nicks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NickGroupBody {
    /// Remote group id
    pub id: GroupId,
    /// Parent group id (`-1` for the nicklist root)
    pub parent_group_id: GroupId,
    /// Group name
    pub name: Option<String>,
    /// Color name
    pub color_name: Option<String>,
    /// Group is visible
    pub visible: bool,
    /// Nested groups, merged before `nicks`
    pub groups: Vec<NickGroupBody>,
    /// Nicks directly in this group
    pub nicks: Vec<NickBody>,
}

impl NickGroupBody {
    /// Read a group body; fails only if the body is not an object.
    pub fn from_value(value: &Value) -> Result<Self, WireError> {
        object(value, "nick_group body").map(Self::from_object)
    }

    /// Read a group (and its subtree) from an object.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            id: GroupId::new(obj.int_or("id", -1)),
            parent_group_id: GroupId::new(obj.int_or("parent_group_id", -1)),
            name: owned(obj, "name"),
            color_name: owned(obj, "color_name"),
            visible: obj.flag("visible"),
            groups: obj
                .array_field("groups")
                .iter()
                .filter_map(Value::as_object)
                .map(Self::from_object)
                .collect(),
            nicks: obj
                .array_field("nicks")
                .iter()
                .filter_map(Value::as_object)
                .map(NickBody::from_object)
                .collect(),
        }
    }
}

impl Default for NickGroupBody {
    fn default() -> Self {
        Self::from_object(&Map::new())
    }
}

/// A single nick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NickBody {
    /// Remote nick id
    pub id: NickId,
    /// Group containing this nick
    pub parent_group_id: GroupId,
    /// Nick name
    pub name: Option<String>,
    /// Color name
    pub color_name: Option<String>,
    /// Prefix (`@`, `+`, ...)
    pub prefix: Option<String>,
    /// Color name of the prefix
    pub prefix_color_name: Option<String>,
    /// Nick is visible
    pub visible: bool,
}

impl NickBody {
    /// Read a nick body; fails only if the body is not an object.
    pub fn from_value(value: &Value) -> Result<Self, WireError> {
        object(value, "nick body").map(Self::from_object)
    }

    /// Read a nick from an object.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            id: NickId::new(obj.int_or("id", -1)),
            parent_group_id: GroupId::new(obj.int_or("parent_group_id", -1)),
            name: owned(obj, "name"),
            color_name: owned(obj, "color_name"),
            prefix: owned(obj, "prefix"),
            prefix_color_name: owned(obj, "prefix_color_name"),
            visible: obj.flag("visible"),
        }
    }
}

impl Default for NickBody {
    fn default() -> Self {
        Self::from_object(&Map::new())
    }
}

/// Version information of the remote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionBody {
    /// Version of the remote client
    pub weechat_version: Option<String>,
    /// Git revision of the remote client
    pub weechat_version_git: Option<String>,
    /// Relay API version
    pub relay_api_version: Option<String>,
}

impl VersionBody {
    /// Read a version body; fails only if the body is not an object.
    pub fn from_value(value: &Value) -> Result<Self, WireError> {
        let obj = object(value, "version body")?;
        Ok(Self {
            weechat_version: owned(obj, "weechat_version"),
            weechat_version_git: owned(obj, "weechat_version_git"),
            relay_api_version: owned(obj, "relay_api_version"),
        })
    }
}

/// Requests sent to the remote.
///
/// Serialized as `{"request": "<verb> <path>", "body": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", content = "body")]
pub enum Request {
    /// Text typed in a mirrored buffer
    #[serde(rename = "POST /api/input")]
    Input(InputRequest),
    /// Ask the remote to start pushing events
    #[serde(rename = "POST /api/sync")]
    Sync(SyncRequest),
}

impl Request {
    /// Input request for a remote buffer.
    pub fn input(buffer_id: BufferId, command: &str) -> Self {
        Self::Input(InputRequest {
            buffer_id,
            command: command.to_string(),
        })
    }

    /// Sync request with the client color scheme.
    pub fn sync(colors: &str) -> Self {
        Self::Sync(SyncRequest {
            colors: colors.to_string(),
        })
    }

    /// Serialize to JSON text.
    pub fn to_json(&self) -> Result<String, WireError> {
        serde_json::to_string(self).map_err(WireError::Serialization)
    }

    /// Deserialize from JSON text.
    pub fn from_json(data: &str) -> Result<Self, WireError> {
        serde_json::from_str(data).map_err(WireError::InvalidJson)
    }
}

/// Body of `POST /api/input`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRequest {
    /// Remote buffer receiving the input
    pub buffer_id: BufferId,
    /// Raw text, sent verbatim
    pub command: String,
}

/// Body of `POST /api/sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    /// Color scheme the remote should use in pushed text
    pub colors: String,
}
