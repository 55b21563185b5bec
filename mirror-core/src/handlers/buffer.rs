//! Buffer body handler.
//!
//! A `buffer` body is a snapshot: every property is written on each
//! application, so fields missing from the snapshot clear the local value.
//! The handler never fails; a snapshot it cannot use is skipped.

use relay_mirror_types::BufferBody;
use serde_json::Value;
use tracing::debug;

use super::{line, nicklist, EventContext};
use crate::error::HandlerResult;
use crate::store::{BufferProperty, BufferProps, InputBinding, NicklistStore};

/// Handle a `buffer` body: create or update the local buffer, then apply
/// its keys, lines and nicklist.
pub fn handle<S: NicklistStore>(
    ctx: &EventContext<'_, S::Buffer>,
    store: &mut S,
    body: Option<&Value>,
) -> HandlerResult {
    let remote = ctx.remote.name();
    let Some(body) = body.and_then(|value| BufferBody::from_value(value).ok()) else {
        debug!(remote, "buffer body is not an object, skipped");
        return Ok(());
    };
    let props = BufferProps::from_body(remote, &body);

    let buffer = match store.find_buffer(remote, body.id) {
        Some(buffer) => {
            for (property, value) in props.iter() {
                store.set_property(buffer, property, value);
            }
            buffer
        }
        None => {
            let full_name = ctx
                .config
                .full_buffer_name(remote, body.name.as_deref().unwrap_or(""));
            match store.create_buffer(&full_name, &props, InputBinding::new(remote)) {
                Some(buffer) => {
                    debug!(remote, id = %body.id, full_name = %full_name, "buffer created");
                    buffer
                }
                None => {
                    debug!(remote, id = %body.id, full_name = %full_name, "buffer could not be created");
                    return Ok(());
                }
            }
        }
    };

    for key in &body.keys {
        store.set_property(
            buffer,
            &BufferProperty::KeyBind(key.key.clone()),
            Some(&key.command),
        );
    }

    for entry in &body.lines {
        line::append(store, buffer, entry);
    }

    if let Some(root) = &body.nicklist_root {
        nicklist::merge_group(store, buffer, root, ctx.config.max_nicklist_depth);
    }

    Ok(())
}
