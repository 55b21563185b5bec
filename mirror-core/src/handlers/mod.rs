//! Body handlers, one per body type.
//!
//! Every handler receives one body element and the context shared by all
//! elements of the message. Soft misses (unknown buffer, unresolved parent
//! group, missing removal target) skip the affected part and still report
//! success. A body element that is absent or not an object reads like an
//! empty object, except for `buffer`, which skips it.

pub mod buffer;
pub mod line;
pub mod nicklist;
pub mod version;

use relay_mirror_types::{BodyType, BufferId, PushEvent, WireError};
use serde_json::Value;

use crate::action::Action;
use crate::config::MirrorConfig;
use crate::error::HandlerResult;
use crate::remote::Remote;
use crate::store::{BufferStore, NicklistStore};

/// Context shared by every body element of one message.
#[derive(Debug, Clone, Copy)]
pub struct EventContext<'a, B> {
    /// Remote the message came from.
    pub remote: &'a Remote,
    /// Local buffer targeted by the push event, if it resolved.
    pub buffer: Option<B>,
    /// Push event the message carries, if any.
    pub event: Option<&'a PushEvent>,
    /// Mirror configuration.
    pub config: &'a MirrorConfig,
}

/// Resolve the local buffer mirroring remote buffer `id`.
pub fn resolve_buffer<S: BufferStore>(store: &S, remote: &str, id: BufferId) -> Option<S::Buffer> {
    if !id.is_valid() {
        return None;
    }
    store.find_buffer(remote, id)
}

/// Run the handler for `kind` on one body element.
pub fn invoke<S: NicklistStore>(
    kind: BodyType,
    ctx: &EventContext<'_, S::Buffer>,
    store: &mut S,
    body: Option<&Value>,
    actions: &mut Vec<Action>,
) -> HandlerResult {
    match kind {
        BodyType::Buffer => buffer::handle(ctx, store, body),
        BodyType::Line => line::handle(ctx, store, body),
        BodyType::NickGroup => nicklist::handle_group(ctx, store, body),
        BodyType::Nick => nicklist::handle_nick(ctx, store, body),
        BodyType::Version => version::handle(ctx, body, actions),
    }
}

/// Read a body element, falling back to the empty-object reading.
fn lenient<T: Default>(
    body: Option<&Value>,
    read: impl FnOnce(&Value) -> Result<T, WireError>,
) -> T {
    body.and_then(|value| read(value).ok()).unwrap_or_default()
}
