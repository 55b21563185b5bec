//! Outbound relay: requests the core sends to the remote.

use relay_mirror_types::{BodyType, BufferId, Request};
use tracing::debug;

use crate::config::MirrorConfig;
use crate::remote::Remote;
use crate::store::{BufferProperty, BufferStore};

/// Remote buffer id stamped on a local buffer.
pub fn stamped_buffer_id<S: BufferStore>(store: &S, buffer: S::Buffer) -> Option<BufferId> {
    let text = store.property(buffer, &BufferProperty::RelayRemoteId)?;
    let id = BufferId::new(text.trim().parse().ok()?);
    id.is_valid().then_some(id)
}

/// Build the request relaying `text` typed in `buffer`.
///
/// The text is sent verbatim. Returns `None` (input dropped) when the
/// buffer carries no remote id.
pub fn input_request<S: BufferStore>(store: &S, buffer: S::Buffer, text: &str) -> Option<Request> {
    match stamped_buffer_id(store, buffer) {
        Some(id) => Some(Request::input(id, text)),
        None => {
            debug!(?buffer, "input on buffer without remote id dropped");
            None
        }
    }
}

/// Sync request, if this response is the first buffer snapshot received
/// by an unsynced remote. Marks the remote synced when it fires.
pub(crate) fn sync_request(
    remote: &mut Remote,
    code: i64,
    kind: BodyType,
    config: &MirrorConfig,
) -> Option<Request> {
    if remote.is_synced() || code != 200 || kind != BodyType::Buffer {
        return None;
    }
    remote.mark_synced();
    Some(Request::sync(&config.sync_colors))
}
