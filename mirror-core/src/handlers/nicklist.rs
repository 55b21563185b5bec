//! Nicklist reconciler.
//!
//! Groups and nicks are created or updated in place, keyed by the remote id
//! stamped on them. A node is only created once its declared parent is
//! found locally; a group whose parent is missing is dropped together with
//! everything below it, and the next full snapshot repairs the tree.
//!
//! A group with a negative parent id is the remote nicklist root. It maps
//! onto the implicit root group of the local buffer, which is stamped with
//! the remote root id so that children resolve their parent normally.

use relay_mirror_types::{NickBody, NickGroupBody, PushEvent};
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::{lenient, EventContext};
use crate::error::HandlerResult;
use crate::store::{GroupProperty, NewGroup, NewNick, NickProperty, NicklistStore};

/// Handle a `nick_group` body: merge the subtree, or remove the group on a
/// removal event.
pub fn handle_group<S: NicklistStore>(
    ctx: &EventContext<'_, S::Buffer>,
    store: &mut S,
    body: Option<&Value>,
) -> HandlerResult {
    let Some(buffer) = ctx.buffer else {
        trace!(remote = ctx.remote.name(), "nick group for unknown buffer ignored");
        return Ok(());
    };
    let group: NickGroupBody = lenient(body, NickGroupBody::from_value);

    if ctx.event.is_some_and(PushEvent::is_group_removal) {
        match store.find_group(buffer, group.id) {
            Some(local) => store.remove_group(buffer, local),
            None => debug!(id = %group.id, "group to remove not found"),
        }
        return Ok(());
    }

    merge_group(store, buffer, &group, ctx.config.max_nicklist_depth);
    Ok(())
}

/// Handle a `nick` body: create or update the nick, or remove it on a
/// removal event.
pub fn handle_nick<S: NicklistStore>(
    ctx: &EventContext<'_, S::Buffer>,
    store: &mut S,
    body: Option<&Value>,
) -> HandlerResult {
    let Some(buffer) = ctx.buffer else {
        trace!(remote = ctx.remote.name(), "nick for unknown buffer ignored");
        return Ok(());
    };
    let nick: NickBody = lenient(body, NickBody::from_value);

    if ctx.event.is_some_and(PushEvent::is_nick_removal) {
        match store.find_nick(buffer, nick.id) {
            Some(local) => store.remove_nick(buffer, local),
            None => debug!(id = %nick.id, "nick to remove not found"),
        }
        return Ok(());
    }

    upsert_nick(store, buffer, &nick);
    Ok(())
}

/// Merge a group subtree: the group itself, then its nested groups, then
/// its nicks.
///
/// `depth_left` counts the levels still allowed, this one included.
pub fn merge_group<S: NicklistStore>(
    store: &mut S,
    buffer: S::Buffer,
    group: &NickGroupBody,
    depth_left: usize,
) {
    if depth_left == 0 {
        warn!(id = %group.id, "nicklist nested too deep, subtree dropped");
        return;
    }
    if upsert_group(store, buffer, group).is_none() {
        return;
    }
    for child in &group.groups {
        merge_group(store, buffer, child, depth_left - 1);
    }
    for nick in &group.nicks {
        upsert_nick(store, buffer, nick);
    }
}

fn upsert_group<S: NicklistStore>(
    store: &mut S,
    buffer: S::Buffer,
    group: &NickGroupBody,
) -> Option<S::Group> {
    if !group.id.is_valid() {
        debug!(id = %group.id, "group without valid id dropped");
        return None;
    }

    if let Some(local) = store.find_group(buffer, group.id) {
        update_group(store, buffer, local, group);
        return Some(local);
    }

    let local = if group.parent_group_id.is_valid() {
        let Some(parent) = store.find_group(buffer, group.parent_group_id) else {
            debug!(
                id = %group.id,
                parent = %group.parent_group_id,
                "parent group not found, subtree dropped"
            );
            return None;
        };
        let new = NewGroup {
            name: group.name.as_deref(),
            color: group.color_name.as_deref(),
            visible: group.visible,
        };
        store.add_group(buffer, parent, &new)?
    } else {
        let root = store.root_group(buffer)?;
        update_group(store, buffer, root, group);
        root
    };

    store.set_group(buffer, local, GroupProperty::Id(group.id));
    Some(local)
}

fn update_group<S: NicklistStore>(
    store: &mut S,
    buffer: S::Buffer,
    local: S::Group,
    group: &NickGroupBody,
) {
    store.set_group(buffer, local, GroupProperty::Color(group.color_name.as_deref()));
    store.set_group(buffer, local, GroupProperty::Visible(group.visible));
    store.set_group(buffer, local, GroupProperty::Id(group.id));
}

fn upsert_nick<S: NicklistStore>(store: &mut S, buffer: S::Buffer, nick: &NickBody) {
    if !nick.id.is_valid() {
        debug!(id = %nick.id, "nick without valid id dropped");
        return;
    }

    if let Some(local) = store.find_nick(buffer, nick.id) {
        store.set_nick(buffer, local, NickProperty::Color(nick.color_name.as_deref()));
        store.set_nick(buffer, local, NickProperty::Prefix(nick.prefix.as_deref()));
        store.set_nick(
            buffer,
            local,
            NickProperty::PrefixColor(nick.prefix_color_name.as_deref()),
        );
        store.set_nick(buffer, local, NickProperty::Visible(nick.visible));
        store.set_nick(buffer, local, NickProperty::Id(nick.id));
        return;
    }

    let parent = if nick.parent_group_id.is_valid() {
        store.find_group(buffer, nick.parent_group_id)
    } else {
        store.root_group(buffer)
    };
    let Some(parent) = parent else {
        debug!(id = %nick.id, parent = %nick.parent_group_id, "parent group not found, nick dropped");
        return;
    };

    let new = NewNick {
        name: nick.name.as_deref(),
        color: nick.color_name.as_deref(),
        prefix: nick.prefix.as_deref(),
        prefix_color: nick.prefix_color_name.as_deref(),
        visible: nick.visible,
    };
    if let Some(local) = store.add_nick(buffer, parent, &new) {
        store.set_nick(buffer, local, NickProperty::Id(nick.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MirrorConfig;
    use crate::remote::Remote;
    use crate::store::memory::{BufferHandle, MemoryStore};
    use crate::store::{BufferProps, BufferStore, InputBinding};
    use relay_mirror_types::{
        BufferBody, BufferId, GroupId, NickId, EVENT_NICKLIST_GROUP_REMOVING,
        EVENT_NICKLIST_NICK_REMOVING,
    };
    use serde_json::json;

    fn setup() -> (MemoryStore, BufferHandle) {
        let mut store = MemoryStore::new();
        let body = BufferBody::from_value(&json!({"id": 1, "name": "#a"})).unwrap();
        let buffer = store
            .create_buffer(
                "remote.home.#a",
                &BufferProps::from_body("home", &body),
                InputBinding::new("home"),
            )
            .unwrap();
        (store, buffer)
    }

    fn removal(name: &str) -> PushEvent {
        PushEvent {
            name: Some(name.to_string()),
            buffer_id: BufferId::new(1),
        }
    }

    fn group(value: Value) -> NickGroupBody {
        NickGroupBody::from_value(&value).unwrap()
    }

    fn tree() -> NickGroupBody {
        group(json!({
            "id": 0, "parent_group_id": -1, "name": "root",
            "groups": [
                {"id": 1, "parent_group_id": 0, "name": "000|o", "color_name": "weechat.color.nicklist_group", "visible": true,
                 "nicks": [{"id": 10, "parent_group_id": 1, "name": "alice", "prefix": "@", "visible": true}]},
                {"id": 2, "parent_group_id": 0, "name": "999|...", "visible": true,
                 "nicks": [{"id": 11, "parent_group_id": 2, "name": "bob", "prefix": " ", "visible": true}]}
            ]
        }))
    }

    // ===========================================
    // Merge Tests
    // ===========================================

    #[test]
    fn root_is_adopted_and_children_created() {
        let (mut store, buffer) = setup();
        merge_group(&mut store, buffer, &tree(), 64);

        let nicklist = store.buffer(buffer).unwrap().nicklist();
        assert_eq!(nicklist.group_count(), 2);
        assert_eq!(nicklist.nick_count(), 2);
        assert_eq!(nicklist.root().unwrap().id, Some(GroupId::new(0)));
        assert_eq!(nicklist.group_parent(GroupId::new(1)), Some(GroupId::new(0)));
        assert_eq!(nicklist.nick_parent(NickId::new(11)), Some(GroupId::new(2)));
    }

    #[test]
    fn merging_twice_creates_nothing_new() {
        let (mut store, buffer) = setup();
        merge_group(&mut store, buffer, &tree(), 64);
        let before = store.buffer(buffer).unwrap().nicklist().outline();

        merge_group(&mut store, buffer, &tree(), 64);

        assert_eq!(store.buffer(buffer).unwrap().nicklist().outline(), before);
    }

    #[test]
    fn existing_group_is_updated() {
        let (mut store, buffer) = setup();
        merge_group(&mut store, buffer, &tree(), 64);

        let update = group(json!({"id": 1, "parent_group_id": 0, "name": "ops", "color_name": "red", "visible": false}));
        merge_group(&mut store, buffer, &update, 64);

        let ops = store.buffer(buffer).unwrap().nicklist().group(GroupId::new(1)).unwrap();
        assert_eq!(ops.color.as_deref(), Some("red"));
        assert!(!ops.visible);
        assert_eq!(store.buffer(buffer).unwrap().nicklist().group_count(), 2);
    }

    #[test]
    fn orphan_group_drops_subtree() {
        let (mut store, buffer) = setup();
        let orphan = group(json!({
            "id": 5, "parent_group_id": 99, "name": "lost",
            "groups": [{"id": 6, "parent_group_id": 5}],
            "nicks": [{"id": 50, "parent_group_id": 5, "name": "ghost"}]
        }));

        merge_group(&mut store, buffer, &orphan, 64);

        let nicklist = store.buffer(buffer).unwrap().nicklist();
        assert_eq!(nicklist.group_count(), 0);
        assert_eq!(nicklist.nick_count(), 0);
    }

    #[test]
    fn depth_limit_drops_deeper_levels() {
        let (mut store, buffer) = setup();
        let deep = group(json!({
            "id": 0, "parent_group_id": -1,
            "groups": [{"id": 1, "parent_group_id": 0,
                "groups": [{"id": 2, "parent_group_id": 1,
                    "groups": [{"id": 3, "parent_group_id": 2}]}]}]
        }));

        merge_group(&mut store, buffer, &deep, 3);

        let nicklist = store.buffer(buffer).unwrap().nicklist();
        assert!(nicklist.group(GroupId::new(2)).is_some());
        assert!(nicklist.group(GroupId::new(3)).is_none());
    }

    #[test]
    fn group_without_id_is_dropped() {
        let (mut store, buffer) = setup();
        merge_group(&mut store, buffer, &tree(), 64);
        merge_group(&mut store, buffer, &group(json!({"parent_group_id": 0, "name": "anon"})), 64);
        assert_eq!(store.buffer(buffer).unwrap().nicklist().group_count(), 2);
    }

    // ===========================================
    // Nick Tests
    // ===========================================

    #[test]
    fn nick_update_keeps_identity() {
        let (mut store, buffer) = setup();
        merge_group(&mut store, buffer, &tree(), 64);
        let before = store.find_nick(buffer, NickId::new(10));

        let nick = NickBody::from_value(&json!({
            "id": 10, "parent_group_id": 1, "name": "alice", "prefix": "+", "visible": true
        }))
        .unwrap();
        upsert_nick(&mut store, buffer, &nick);

        assert_eq!(store.find_nick(buffer, NickId::new(10)), before);
        let alice = store.buffer(buffer).unwrap().nicklist().nick(NickId::new(10)).unwrap();
        assert_eq!(alice.prefix.as_deref(), Some("+"));
    }

    #[test]
    fn nick_with_missing_parent_is_dropped() {
        let (mut store, buffer) = setup();
        let nick = NickBody::from_value(&json!({"id": 10, "parent_group_id": 7, "name": "x"})).unwrap();
        upsert_nick(&mut store, buffer, &nick);
        assert_eq!(store.buffer(buffer).unwrap().nicklist().nick_count(), 0);
    }

    #[test]
    fn nick_without_parent_lands_in_root() {
        let (mut store, buffer) = setup();
        let nick = NickBody::from_value(&json!({"id": 10, "name": "x"})).unwrap();
        upsert_nick(&mut store, buffer, &nick);
        let nicklist = store.buffer(buffer).unwrap().nicklist();
        assert_eq!(nicklist.nick_count(), 1);
        assert_eq!(nicklist.nick_parent(NickId::new(10)), None);
    }

    // ===========================================
    // Removal Tests
    // ===========================================

    #[test]
    fn removal_events_delete_by_id() {
        let (mut store, buffer) = setup();
        merge_group(&mut store, buffer, &tree(), 64);
        let remote = Remote::new("home");
        let config = MirrorConfig::default();

        let nick_removing = removal(EVENT_NICKLIST_NICK_REMOVING);
        let group_removing = removal(EVENT_NICKLIST_GROUP_REMOVING);

        let ctx = EventContext {
            remote: &remote,
            buffer: Some(buffer),
            event: Some(&nick_removing),
            config: &config,
        };
        handle_nick(&ctx, &mut store, Some(&json!({"id": 10}))).unwrap();
        assert!(store.find_nick(buffer, NickId::new(10)).is_none());

        let ctx = EventContext {
            event: Some(&group_removing),
            ..ctx
        };
        handle_group(&ctx, &mut store, Some(&json!({"id": 2}))).unwrap();
        assert!(store.find_group(buffer, GroupId::new(2)).is_none());
        assert!(store.find_nick(buffer, NickId::new(11)).is_none());

        // Second removal is a soft miss.
        handle_group(&ctx, &mut store, Some(&json!({"id": 2}))).unwrap();
        assert_eq!(store.buffer(buffer).unwrap().nicklist().group_count(), 1);
    }

    #[test]
    fn unbound_buffer_is_ignored() {
        let (mut store, _) = setup();
        let remote = Remote::new("home");
        let config = MirrorConfig::default();
        let ctx = EventContext::<BufferHandle> {
            remote: &remote,
            buffer: None,
            event: None,
            config: &config,
        };
        assert!(handle_nick(&ctx, &mut store, Some(&json!("not an object"))).is_ok());
        assert!(handle_group(&ctx, &mut store, None).is_ok());
    }

    #[test]
    fn non_object_body_reads_as_empty() {
        let (mut store, buffer) = setup();
        merge_group(&mut store, buffer, &tree(), 64);
        let remote = Remote::new("home");
        let config = MirrorConfig::default();
        let nick_removing = removal(EVENT_NICKLIST_NICK_REMOVING);
        let ctx = EventContext {
            remote: &remote,
            buffer: Some(buffer),
            event: None,
            config: &config,
        };

        assert!(handle_nick(&ctx, &mut store, Some(&json!(12))).is_ok());
        assert!(handle_group(&ctx, &mut store, None).is_ok());
        let removing = EventContext {
            event: Some(&nick_removing),
            ..ctx
        };
        assert!(handle_nick(&removing, &mut store, Some(&json!([10]))).is_ok());

        let nicklist = store.buffer(buffer).unwrap().nicklist();
        assert_eq!(nicklist.group_count(), 2);
        assert_eq!(nicklist.nick_count(), 2);
    }
}
