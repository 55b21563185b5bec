//! In-memory store.
//!
//! A complete implementation of [`BufferStore`] and [`NicklistStore`] with
//! no host behind it. Used by the tests and by `mirror-cli` to replay
//! recorded sessions.
//!
//! Each buffer owns a [`Nicklist`]: an arena of group and nick nodes plus
//! two typed indexes (remote group id and remote nick id to node slot).
//! Stamping an id on a node moves its index entry, so a node is always
//! found again by the last id stamped on it.

use relay_mirror_types::{BufferId, GroupId, NickId};
use std::collections::{BTreeMap, HashMap};

use super::{
    BufferProperty, BufferProps, BufferStore, GroupProperty, InputBinding, LinePosition, NewGroup,
    NewNick, NickProperty, NicklistStore, RenderedLine,
};

/// Slot of the implicit root group in every nicklist.
const ROOT_SLOT: u64 = 0;

/// Handle to a buffer in a [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(usize);

/// Handle to a nick group in a [`Nicklist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupHandle(u64);

/// Handle to a nick in a [`Nicklist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NickHandle(u64);

/// A local nick group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    /// Group name.
    pub name: Option<String>,
    /// Color name.
    pub color: Option<String>,
    /// Visibility.
    pub visible: bool,
    /// Remote id stamped on the group.
    pub id: Option<GroupId>,
    parent: Option<u64>,
    groups: Vec<u64>,
    nicks: Vec<u64>,
}

/// A local nick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NickNode {
    /// Nick name.
    pub name: Option<String>,
    /// Color name.
    pub color: Option<String>,
    /// Prefix.
    pub prefix: Option<String>,
    /// Color name of the prefix.
    pub prefix_color: Option<String>,
    /// Visibility.
    pub visible: bool,
    /// Remote id stamped on the nick.
    pub id: Option<NickId>,
    parent: u64,
}

/// Nicklist of one buffer.
#[derive(Debug, Clone)]
pub struct Nicklist {
    groups: HashMap<u64, GroupNode>,
    nicks: HashMap<u64, NickNode>,
    group_ids: HashMap<GroupId, u64>,
    nick_ids: HashMap<NickId, u64>,
    next_slot: u64,
}

impl Nicklist {
    fn new() -> Self {
        let root = GroupNode {
            name: Some("root".to_string()),
            color: None,
            visible: false,
            id: None,
            parent: None,
            groups: Vec::new(),
            nicks: Vec::new(),
        };
        Self {
            groups: HashMap::from([(ROOT_SLOT, root)]),
            nicks: HashMap::new(),
            group_ids: HashMap::new(),
            nick_ids: HashMap::new(),
            next_slot: ROOT_SLOT + 1,
        }
    }

    /// The implicit root group.
    pub fn root(&self) -> Option<&GroupNode> {
        self.groups.get(&ROOT_SLOT)
    }

    /// Group with remote id `id`.
    pub fn group(&self, id: GroupId) -> Option<&GroupNode> {
        self.group_ids.get(&id).and_then(|slot| self.groups.get(slot))
    }

    /// Nick with remote id `id`.
    pub fn nick(&self, id: NickId) -> Option<&NickNode> {
        self.nick_ids.get(&id).and_then(|slot| self.nicks.get(slot))
    }

    /// Remote id of the group containing group `id`.
    pub fn group_parent(&self, id: GroupId) -> Option<GroupId> {
        let parent = self.group(id)?.parent?;
        self.groups.get(&parent)?.id
    }

    /// Remote id of the group containing nick `id`.
    pub fn nick_parent(&self, id: NickId) -> Option<GroupId> {
        let parent = self.nick(id)?.parent;
        self.groups.get(&parent)?.id
    }

    /// Number of groups, not counting the root.
    pub fn group_count(&self) -> usize {
        self.groups.len().saturating_sub(1)
    }

    /// Number of nicks.
    pub fn nick_count(&self) -> usize {
        self.nicks.len()
    }

    /// Indented text rendering of the tree, one node per line.
    pub fn outline(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.outline_group(ROOT_SLOT, 0, &mut out);
        out
    }

    fn outline_group(&self, slot: u64, depth: usize, out: &mut Vec<String>) {
        let Some(group) = self.groups.get(&slot) else {
            return;
        };
        let indent = "  ".repeat(depth);
        out.push(format!(
            "{}{} [{}]",
            indent,
            group.name.as_deref().unwrap_or(""),
            group.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into())
        ));
        for child in &group.groups {
            self.outline_group(*child, depth + 1, out);
        }
        for nick in group.nicks.iter().filter_map(|slot| self.nicks.get(slot)) {
            out.push(format!(
                "{}  {}{} [{}]",
                indent,
                nick.prefix.as_deref().unwrap_or("").trim(),
                nick.name.as_deref().unwrap_or(""),
                nick.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into())
            ));
        }
    }

    fn allocate(&mut self) -> u64 {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }

    fn insert_group(&mut self, parent: u64, group: &NewGroup<'_>) -> Option<u64> {
        if !self.groups.contains_key(&parent) {
            return None;
        }
        let slot = self.allocate();
        self.groups.insert(
            slot,
            GroupNode {
                name: group.name.map(str::to_owned),
                color: group.color.map(str::to_owned),
                visible: group.visible,
                id: None,
                parent: Some(parent),
                groups: Vec::new(),
                nicks: Vec::new(),
            },
        );
        self.groups.get_mut(&parent)?.groups.push(slot);
        Some(slot)
    }

    fn insert_nick(&mut self, parent: u64, nick: &NewNick<'_>) -> Option<u64> {
        if !self.groups.contains_key(&parent) {
            return None;
        }
        let slot = self.allocate();
        self.nicks.insert(
            slot,
            NickNode {
                name: nick.name.map(str::to_owned),
                color: nick.color.map(str::to_owned),
                prefix: nick.prefix.map(str::to_owned),
                prefix_color: nick.prefix_color.map(str::to_owned),
                visible: nick.visible,
                id: None,
                parent,
            },
        );
        self.groups.get_mut(&parent)?.nicks.push(slot);
        Some(slot)
    }

    fn set_group(&mut self, slot: u64, property: GroupProperty<'_>) {
        let Some(node) = self.groups.get_mut(&slot) else {
            return;
        };
        match property {
            GroupProperty::Id(id) => {
                if let Some(old) = node.id.replace(id) {
                    if self.group_ids.get(&old) == Some(&slot) {
                        self.group_ids.remove(&old);
                    }
                }
                self.group_ids.insert(id, slot);
            }
            GroupProperty::Color(color) => node.color = color.map(str::to_owned),
            GroupProperty::Visible(visible) => node.visible = visible,
        }
    }

    fn set_nick(&mut self, slot: u64, property: NickProperty<'_>) {
        let Some(node) = self.nicks.get_mut(&slot) else {
            return;
        };
        match property {
            NickProperty::Id(id) => {
                if let Some(old) = node.id.replace(id) {
                    if self.nick_ids.get(&old) == Some(&slot) {
                        self.nick_ids.remove(&old);
                    }
                }
                self.nick_ids.insert(id, slot);
            }
            NickProperty::Color(color) => node.color = color.map(str::to_owned),
            NickProperty::Prefix(prefix) => node.prefix = prefix.map(str::to_owned),
            NickProperty::PrefixColor(color) => node.prefix_color = color.map(str::to_owned),
            NickProperty::Visible(visible) => node.visible = visible,
        }
    }

    fn remove_group(&mut self, slot: u64) {
        // The root itself stays; only its content goes.
        if slot == ROOT_SLOT {
            let (groups, nicks) = match self.groups.get_mut(&ROOT_SLOT) {
                Some(root) => (
                    std::mem::take(&mut root.groups),
                    std::mem::take(&mut root.nicks),
                ),
                None => return,
            };
            groups.into_iter().for_each(|child| self.remove_group(child));
            nicks.into_iter().for_each(|nick| self.remove_nick(nick));
            return;
        }

        let Some(node) = self.groups.remove(&slot) else {
            return;
        };
        if let Some(id) = node.id {
            if self.group_ids.get(&id) == Some(&slot) {
                self.group_ids.remove(&id);
            }
        }
        for child in node.groups {
            self.remove_group(child);
        }
        for nick in node.nicks {
            self.remove_nick(nick);
        }
        if let Some(parent) = node.parent.and_then(|p| self.groups.get_mut(&p)) {
            parent.groups.retain(|&child| child != slot);
        }
    }

    fn remove_nick(&mut self, slot: u64) {
        let Some(node) = self.nicks.remove(&slot) else {
            return;
        };
        if let Some(id) = node.id {
            if self.nick_ids.get(&id) == Some(&slot) {
                self.nick_ids.remove(&id);
            }
        }
        if let Some(parent) = self.groups.get_mut(&node.parent) {
            parent.nicks.retain(|&nick| nick != slot);
        }
    }
}

/// A local buffer mirroring a remote one.
#[derive(Debug, Clone)]
pub struct MirroredBuffer {
    full_name: String,
    properties: BTreeMap<BufferProperty, String>,
    input: InputBinding,
    lines: Vec<RenderedLine>,
    rows: BTreeMap<u64, RenderedLine>,
    nicklist: Nicklist,
}

impl MirroredBuffer {
    /// Local full name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Value of a property.
    pub fn property(&self, property: &BufferProperty) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    /// All properties currently set, in a stable order.
    pub fn properties(&self) -> impl Iterator<Item = (&BufferProperty, &str)> {
        self.properties.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Key bindings as `(key, command)`.
    pub fn key_bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().filter_map(|(k, v)| match k {
            BufferProperty::KeyBind(key) => Some((key.as_str(), v.as_str())),
            _ => None,
        })
    }

    /// Remote receiving input typed in this buffer.
    pub fn input(&self) -> &InputBinding {
        &self.input
    }

    /// Scrolling lines, oldest first.
    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    /// Free-content line on row `y`.
    pub fn row(&self, y: u64) -> Option<&RenderedLine> {
        self.rows.get(&y)
    }

    /// Number of occupied free-content rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Free-content rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = (u64, &RenderedLine)> {
        self.rows.iter().map(|(y, line)| (*y, line))
    }

    /// Nicklist of the buffer.
    pub fn nicklist(&self) -> &Nicklist {
        &self.nicklist
    }
}

/// In-memory buffer and nicklist storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buffers: Vec<MirroredBuffer>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffers.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Check if the store has no buffers.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Buffer behind a handle.
    pub fn buffer(&self, handle: BufferHandle) -> Option<&MirroredBuffer> {
        self.buffers.get(handle.0)
    }

    /// All buffers, in creation order.
    pub fn buffers(&self) -> impl Iterator<Item = (BufferHandle, &MirroredBuffer)> {
        self.buffers
            .iter()
            .enumerate()
            .map(|(index, buffer)| (BufferHandle(index), buffer))
    }

    /// Buffer with the given local full name.
    pub fn find_by_name(&self, full_name: &str) -> Option<BufferHandle> {
        self.buffers
            .iter()
            .position(|b| b.full_name == full_name)
            .map(BufferHandle)
    }

    fn nicklist(&self, buffer: BufferHandle) -> Option<&Nicklist> {
        self.buffers.get(buffer.0).map(|b| &b.nicklist)
    }

    fn nicklist_mut(&mut self, buffer: BufferHandle) -> Option<&mut Nicklist> {
        self.buffers.get_mut(buffer.0).map(|b| &mut b.nicklist)
    }
}

impl BufferStore for MemoryStore {
    type Buffer = BufferHandle;

    fn find_buffer(&self, remote: &str, id: BufferId) -> Option<BufferHandle> {
        if !id.is_valid() {
            return None;
        }
        let id = id.to_string();
        self.buffers
            .iter()
            .position(|b| {
                b.property(&BufferProperty::RelayRemote) == Some(remote)
                    && b.property(&BufferProperty::RelayRemoteId) == Some(id.as_str())
            })
            .map(BufferHandle)
    }

    fn create_buffer(
        &mut self,
        full_name: &str,
        props: &BufferProps,
        input: InputBinding,
    ) -> Option<BufferHandle> {
        // Full names are unique, like in any host.
        if self.find_by_name(full_name).is_some() {
            return None;
        }
        let properties = props
            .iter()
            .filter_map(|(k, v)| v.map(|v| (k.clone(), v.to_string())))
            .collect();
        self.buffers.push(MirroredBuffer {
            full_name: full_name.to_string(),
            properties,
            input,
            lines: Vec::new(),
            rows: BTreeMap::new(),
            nicklist: Nicklist::new(),
        });
        Some(BufferHandle(self.buffers.len() - 1))
    }

    fn set_property(&mut self, buffer: BufferHandle, property: &BufferProperty, value: Option<&str>) {
        let Some(buffer) = self.buffers.get_mut(buffer.0) else {
            return;
        };
        match value {
            Some(value) => {
                buffer.properties.insert(property.clone(), value.to_string());
            }
            None => {
                buffer.properties.remove(property);
            }
        }
    }

    fn property(&self, buffer: BufferHandle, property: &BufferProperty) -> Option<String> {
        self.buffers
            .get(buffer.0)?
            .property(property)
            .map(str::to_owned)
    }

    fn print(&mut self, buffer: BufferHandle, line: &RenderedLine) {
        let Some(buffer) = self.buffers.get_mut(buffer.0) else {
            return;
        };
        match line.position {
            LinePosition::Fixed(y) => {
                buffer.rows.insert(y, line.clone());
            }
            LinePosition::Scrolling => buffer.lines.push(line.clone()),
        }
    }
}

impl NicklistStore for MemoryStore {
    type Group = GroupHandle;
    type Nick = NickHandle;

    fn root_group(&self, buffer: BufferHandle) -> Option<GroupHandle> {
        self.nicklist(buffer)?.root().map(|_| GroupHandle(ROOT_SLOT))
    }

    fn find_group(&self, buffer: BufferHandle, id: GroupId) -> Option<GroupHandle> {
        self.nicklist(buffer)?
            .group_ids
            .get(&id)
            .copied()
            .map(GroupHandle)
    }

    fn find_nick(&self, buffer: BufferHandle, id: NickId) -> Option<NickHandle> {
        self.nicklist(buffer)?
            .nick_ids
            .get(&id)
            .copied()
            .map(NickHandle)
    }

    fn add_group(
        &mut self,
        buffer: BufferHandle,
        parent: GroupHandle,
        group: &NewGroup<'_>,
    ) -> Option<GroupHandle> {
        self.nicklist_mut(buffer)?
            .insert_group(parent.0, group)
            .map(GroupHandle)
    }

    fn add_nick(
        &mut self,
        buffer: BufferHandle,
        parent: GroupHandle,
        nick: &NewNick<'_>,
    ) -> Option<NickHandle> {
        self.nicklist_mut(buffer)?
            .insert_nick(parent.0, nick)
            .map(NickHandle)
    }

    fn set_group(&mut self, buffer: BufferHandle, group: GroupHandle, property: GroupProperty<'_>) {
        if let Some(nicklist) = self.nicklist_mut(buffer) {
            nicklist.set_group(group.0, property);
        }
    }

    fn set_nick(&mut self, buffer: BufferHandle, nick: NickHandle, property: NickProperty<'_>) {
        if let Some(nicklist) = self.nicklist_mut(buffer) {
            nicklist.set_nick(nick.0, property);
        }
    }

    fn remove_group(&mut self, buffer: BufferHandle, group: GroupHandle) {
        if let Some(nicklist) = self.nicklist_mut(buffer) {
            nicklist.remove_group(group.0);
        }
    }

    fn remove_nick(&mut self, buffer: BufferHandle, nick: NickHandle) {
        if let Some(nicklist) = self.nicklist_mut(buffer) {
            nicklist.remove_nick(nick.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timestamp;
    use relay_mirror_types::BufferBody;
    use serde_json::json;

    fn props(remote: &str, id: i64) -> BufferProps {
        let body = BufferBody::from_value(&json!({"id": id, "number": 1})).unwrap();
        BufferProps::from_body(remote, &body)
    }

    fn group(name: &str) -> NewGroup<'_> {
        NewGroup {
            name: Some(name),
            color: None,
            visible: true,
        }
    }

    fn nick(name: &str) -> NewNick<'_> {
        NewNick {
            name: Some(name),
            color: None,
            prefix: None,
            prefix_color: None,
            visible: true,
        }
    }

    fn store_with_buffer() -> (MemoryStore, BufferHandle) {
        let mut store = MemoryStore::new();
        let buffer = store
            .create_buffer("remote.home.#a", &props("home", 1), InputBinding::new("home"))
            .unwrap();
        (store, buffer)
    }

    // ===========================================
    // Buffer Tests
    // ===========================================

    #[test]
    fn find_buffer_by_remote_and_id() {
        let mut store = MemoryStore::new();
        let a = store
            .create_buffer("remote.home.#a", &props("home", 1), InputBinding::new("home"))
            .unwrap();
        let b = store
            .create_buffer("remote.work.#a", &props("work", 1), InputBinding::new("work"))
            .unwrap();

        assert_eq!(store.find_buffer("home", BufferId::new(1)), Some(a));
        assert_eq!(store.find_buffer("work", BufferId::new(1)), Some(b));
        assert_eq!(store.find_buffer("home", BufferId::new(2)), None);
        assert_eq!(store.find_buffer("home", BufferId::new(-1)), None);
    }

    #[test]
    fn duplicate_full_name_is_refused() {
        let (mut store, _) = store_with_buffer();
        let dup = store.create_buffer("remote.home.#a", &props("home", 2), InputBinding::new("home"));
        assert!(dup.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_property_none_clears() {
        let (mut store, buffer) = store_with_buffer();
        store.set_property(buffer, &BufferProperty::Title, Some("hello"));
        assert_eq!(store.property(buffer, &BufferProperty::Title).as_deref(), Some("hello"));
        store.set_property(buffer, &BufferProperty::Title, None);
        assert_eq!(store.property(buffer, &BufferProperty::Title), None);
    }

    #[test]
    fn print_routes_by_position() {
        let (mut store, buffer) = store_with_buffer();
        let line = |position, text: &str| RenderedLine {
            timestamp: Timestamp::EPOCH,
            position,
            tags: String::new(),
            text: text.to_string(),
        };
        store.print(buffer, &line(LinePosition::Scrolling, "one"));
        store.print(buffer, &line(LinePosition::Fixed(2), "old"));
        store.print(buffer, &line(LinePosition::Fixed(2), "new"));

        let mirrored = store.buffer(buffer).unwrap();
        assert_eq!(mirrored.lines().len(), 1);
        assert_eq!(mirrored.row_count(), 1);
        assert_eq!(mirrored.row(2).unwrap().text, "new");
    }

    // ===========================================
    // Nicklist Tests
    // ===========================================

    #[test]
    fn new_buffer_has_empty_root() {
        let (store, buffer) = store_with_buffer();
        assert!(store.root_group(buffer).is_some());
        let nicklist = store.buffer(buffer).unwrap().nicklist();
        assert_eq!(nicklist.group_count(), 0);
        assert_eq!(nicklist.nick_count(), 0);
    }

    #[test]
    fn stamped_id_is_lookup_key() {
        let (mut store, buffer) = store_with_buffer();
        let root = store.root_group(buffer).unwrap();
        let ops = store.add_group(buffer, root, &group("ops")).unwrap();

        assert_eq!(store.find_group(buffer, GroupId::new(42)), None);
        store.set_group(buffer, ops, GroupProperty::Id(GroupId::new(42)));
        assert_eq!(store.find_group(buffer, GroupId::new(42)), Some(ops));

        store.set_group(buffer, ops, GroupProperty::Id(GroupId::new(43)));
        assert_eq!(store.find_group(buffer, GroupId::new(42)), None);
        assert_eq!(store.find_group(buffer, GroupId::new(43)), Some(ops));
    }

    #[test]
    fn group_and_nick_ids_are_disjoint() {
        let (mut store, buffer) = store_with_buffer();
        let root = store.root_group(buffer).unwrap();
        let alice = store.add_nick(buffer, root, &nick("alice")).unwrap();
        store.set_nick(buffer, alice, NickProperty::Id(NickId::new(5)));

        assert_eq!(store.find_nick(buffer, NickId::new(5)), Some(alice));
        assert_eq!(store.find_group(buffer, GroupId::new(5)), None);
    }

    #[test]
    fn remove_group_drops_subtree() {
        let (mut store, buffer) = store_with_buffer();
        let root = store.root_group(buffer).unwrap();
        let ops = store.add_group(buffer, root, &group("ops")).unwrap();
        store.set_group(buffer, ops, GroupProperty::Id(GroupId::new(1)));
        let sub = store.add_group(buffer, ops, &group("sub")).unwrap();
        store.set_group(buffer, sub, GroupProperty::Id(GroupId::new(2)));
        let alice = store.add_nick(buffer, sub, &nick("alice")).unwrap();
        store.set_nick(buffer, alice, NickProperty::Id(NickId::new(10)));

        store.remove_group(buffer, ops);

        assert_eq!(store.find_group(buffer, GroupId::new(1)), None);
        assert_eq!(store.find_group(buffer, GroupId::new(2)), None);
        assert_eq!(store.find_nick(buffer, NickId::new(10)), None);
        assert_eq!(store.buffer(buffer).unwrap().nicklist().group_count(), 0);
    }

    #[test]
    fn removing_root_keeps_root() {
        let (mut store, buffer) = store_with_buffer();
        let root = store.root_group(buffer).unwrap();
        store.add_nick(buffer, root, &nick("alice")).unwrap();
        store.remove_group(buffer, root);

        assert_eq!(store.root_group(buffer), Some(root));
        assert_eq!(store.buffer(buffer).unwrap().nicklist().nick_count(), 0);
    }

    #[test]
    fn outline_shows_tree() {
        let (mut store, buffer) = store_with_buffer();
        let root = store.root_group(buffer).unwrap();
        store.set_group(buffer, root, GroupProperty::Id(GroupId::new(0)));
        let ops = store.add_group(buffer, root, &group("000|o")).unwrap();
        store.set_group(buffer, ops, GroupProperty::Id(GroupId::new(1)));
        let alice = store
            .add_nick(
                buffer,
                ops,
                &NewNick {
                    prefix: Some("@"),
                    ..nick("alice")
                },
            )
            .unwrap();
        store.set_nick(buffer, alice, NickProperty::Id(NickId::new(10)));

        assert_eq!(
            store.buffer(buffer).unwrap().nicklist().outline(),
            vec!["root [0]", "  000|o [1]", "    @alice [10]"]
        );
    }
}
