//! Capability interfaces of the local buffer and nicklist storage.
//!
//! The core never holds on to local nodes between messages: buffers are
//! re-resolved by `(remote name, remote id)` and nicklist nodes by their
//! typed remote id every time. Handles returned by a store are only used
//! within the processing of a single message.
//!
//! Groups and nicks live in disjoint id namespaces ([`GroupId`] vs
//! [`NickId`]), scoped per buffer.

pub mod memory;

use relay_mirror_types::{BufferBody, BufferId, GroupId, NickId};
use std::fmt;

use crate::time::Timestamp;

/// A property of a local buffer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BufferProperty {
    /// Buffer type tag.
    Type,
    /// Short name.
    ShortName,
    /// Title.
    Title,
    /// Nicklist displayed (`"1"`/`"0"`).
    Nicklist,
    /// Nicklist case sensitivity (`"1"`/`"0"`).
    NicklistCaseSensitive,
    /// Groups displayed in the nicklist (`"1"`/`"0"`).
    NicklistDisplayGroups,
    /// Name of the owning remote.
    RelayRemote,
    /// Remote buffer id, as decimal text.
    RelayRemoteId,
    /// Remote buffer number, as decimal text.
    RelayRemoteNumber,
    /// Input is forwarded even when it looks like a local command.
    InputGetAnyUserData,
    /// Key binding: key name to command.
    KeyBind(String),
}

impl fmt::Display for BufferProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => f.write_str("type"),
            Self::ShortName => f.write_str("short_name"),
            Self::Title => f.write_str("title"),
            Self::Nicklist => f.write_str("nicklist"),
            Self::NicklistCaseSensitive => f.write_str("nicklist_case_sensitive"),
            Self::NicklistDisplayGroups => f.write_str("nicklist_display_groups"),
            Self::RelayRemote => f.write_str("localvar_relay_remote"),
            Self::RelayRemoteId => f.write_str("localvar_relay_remote_id"),
            Self::RelayRemoteNumber => f.write_str("localvar_relay_remote_number"),
            Self::InputGetAnyUserData => f.write_str("input_get_any_user_data"),
            Self::KeyBind(key) => write!(f, "key_bind_{}", key),
        }
    }
}

fn flag(value: bool) -> Option<String> {
    Some(if value { "1" } else { "0" }.to_string())
}

/// The full property set written to a buffer on every snapshot.
///
/// Every entry is always present; a field missing from the snapshot is
/// carried as `None` so that applying the set clears the old value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferProps {
    entries: Vec<(BufferProperty, Option<String>)>,
}

impl BufferProps {
    /// Build the property set for a buffer snapshot from `remote`.
    pub fn from_body(remote: &str, body: &BufferBody) -> Self {
        let entries = vec![
            (BufferProperty::Type, body.kind.clone()),
            (BufferProperty::ShortName, body.short_name.clone()),
            (BufferProperty::Title, body.title.clone()),
            (BufferProperty::Nicklist, flag(body.nicklist)),
            (
                BufferProperty::NicklistCaseSensitive,
                flag(body.nicklist_case_sensitive),
            ),
            (
                BufferProperty::NicklistDisplayGroups,
                flag(body.nicklist_display_groups),
            ),
            (BufferProperty::RelayRemote, Some(remote.to_string())),
            (BufferProperty::RelayRemoteId, Some(body.id.to_string())),
            (BufferProperty::RelayRemoteNumber, Some(body.number.to_string())),
            (BufferProperty::InputGetAnyUserData, flag(true)),
        ];
        Self { entries }
    }

    /// Iterate over `(property, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&BufferProperty, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k, v.as_deref()))
    }

    /// Value of one property in the set.
    pub fn get(&self, property: &BufferProperty) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == property)
            .and_then(|(_, v)| v.as_deref())
    }
}

/// Which remote receives input typed in a created buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputBinding {
    /// Remote name.
    pub remote: String,
}

impl InputBinding {
    /// Bind input to `remote`.
    pub fn new(remote: &str) -> Self {
        Self {
            remote: remote.to_string(),
        }
    }
}

/// Where a line is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinePosition {
    /// Free content: replaces whatever is on this row.
    Fixed(u64),
    /// Formatted content: appended after the last line.
    Scrolling,
}

impl LinePosition {
    /// Fixed row for `y >= 0`, scrolling otherwise.
    pub fn from_y(y: i64) -> Self {
        u64::try_from(y).map(Self::Fixed).unwrap_or(Self::Scrolling)
    }
}

/// A line ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// Date of the line.
    pub timestamp: Timestamp,
    /// Row or scrolling.
    pub position: LinePosition,
    /// Comma-separated tags.
    pub tags: String,
    /// `prefix\tmessage`, or just `message` without prefix.
    pub text: String,
}

/// Fields of a group being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewGroup<'a> {
    /// Group name.
    pub name: Option<&'a str>,
    /// Color name.
    pub color: Option<&'a str>,
    /// Visibility.
    pub visible: bool,
}

/// Fields of a nick being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewNick<'a> {
    /// Nick name.
    pub name: Option<&'a str>,
    /// Color name.
    pub color: Option<&'a str>,
    /// Prefix.
    pub prefix: Option<&'a str>,
    /// Color name of the prefix.
    pub prefix_color: Option<&'a str>,
    /// Visibility.
    pub visible: bool,
}

/// A mutable property of a nick group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupProperty<'a> {
    /// Remote id; also the key the group is found by afterwards.
    Id(GroupId),
    /// Color name.
    Color(Option<&'a str>),
    /// Visibility.
    Visible(bool),
}

/// A mutable property of a nick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NickProperty<'a> {
    /// Remote id; also the key the nick is found by afterwards.
    Id(NickId),
    /// Color name.
    Color(Option<&'a str>),
    /// Prefix.
    Prefix(Option<&'a str>),
    /// Color name of the prefix.
    PrefixColor(Option<&'a str>),
    /// Visibility.
    Visible(bool),
}

/// Local buffer storage.
pub trait BufferStore {
    /// Handle to a local buffer, valid for the current message.
    type Buffer: Copy + Eq + fmt::Debug;

    /// Find the buffer mirroring remote buffer `id` of `remote`.
    fn find_buffer(&self, remote: &str, id: BufferId) -> Option<Self::Buffer>;

    /// Create a buffer with all `props` set, routing input to `input`.
    ///
    /// Returns `None` if the host refuses the buffer.
    fn create_buffer(
        &mut self,
        full_name: &str,
        props: &BufferProps,
        input: InputBinding,
    ) -> Option<Self::Buffer>;

    /// Set (or clear, with `None`) one property.
    fn set_property(&mut self, buffer: Self::Buffer, property: &BufferProperty, value: Option<&str>);

    /// Read one property.
    fn property(&self, buffer: Self::Buffer, property: &BufferProperty) -> Option<String>;

    /// Print a line.
    fn print(&mut self, buffer: Self::Buffer, line: &RenderedLine);
}

/// Local nicklist storage, per buffer.
pub trait NicklistStore: BufferStore {
    /// Handle to a local nick group.
    type Group: Copy + Eq + fmt::Debug;
    /// Handle to a local nick.
    type Nick: Copy + Eq + fmt::Debug;

    /// The implicit root group every buffer has.
    fn root_group(&self, buffer: Self::Buffer) -> Option<Self::Group>;

    /// Find a group by the remote id stamped on it.
    fn find_group(&self, buffer: Self::Buffer, id: GroupId) -> Option<Self::Group>;

    /// Find a nick by the remote id stamped on it.
    fn find_nick(&self, buffer: Self::Buffer, id: NickId) -> Option<Self::Nick>;

    /// Create a group under `parent`.
    fn add_group(
        &mut self,
        buffer: Self::Buffer,
        parent: Self::Group,
        group: &NewGroup<'_>,
    ) -> Option<Self::Group>;

    /// Create a nick under `parent`.
    fn add_nick(
        &mut self,
        buffer: Self::Buffer,
        parent: Self::Group,
        nick: &NewNick<'_>,
    ) -> Option<Self::Nick>;

    /// Set one group property.
    fn set_group(&mut self, buffer: Self::Buffer, group: Self::Group, property: GroupProperty<'_>);

    /// Set one nick property.
    fn set_nick(&mut self, buffer: Self::Buffer, nick: Self::Nick, property: NickProperty<'_>);

    /// Remove a group with everything below it.
    fn remove_group(&mut self, buffer: Self::Buffer, group: Self::Group);

    /// Remove a nick.
    fn remove_nick(&mut self, buffer: Self::Buffer, nick: Self::Nick);
}
