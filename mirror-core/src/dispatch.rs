//! Event dispatcher.
//!
//! Entry point of the core: one call per inbound message. The message is
//! applied to the store in full before the call returns; the returned
//! actions hold whatever must go back out.

use relay_mirror_types::Envelope;
use tracing::debug;

use crate::action::Action;
use crate::config::MirrorConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::handlers::{self, EventContext};
use crate::outbound;
use crate::remote::Remote;
use crate::store::NicklistStore;

/// Routes inbound messages to the body handlers.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: MirrorConfig,
}

impl Dispatcher {
    /// Create a dispatcher.
    pub fn new(config: MirrorConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Apply one message from `remote` to `store`.
    ///
    /// An array body runs the handler once per element; the first failing
    /// element stops the message. Errors never affect the remote itself:
    /// the caller reports them and keeps feeding messages.
    pub fn recv<S: NicklistStore>(
        &self,
        remote: &mut Remote,
        store: &mut S,
        data: &str,
    ) -> DispatchResult<Vec<Action>> {
        debug!(remote = remote.name(), "recv from remote: {}", data);

        let envelope = Envelope::parse(data)
            .map_err(|e| malformed(remote, &e.to_string(), data))?;

        let Some(tag) = envelope.body_type.as_deref() else {
            if envelope.is_empty_success() {
                return Ok(Vec::new());
            }
            return Err(malformed(remote, "missing body type", data));
        };

        let buffer = envelope
            .event
            .as_ref()
            .and_then(|event| handlers::resolve_buffer(store, remote.name(), event.buffer_id));

        let Some(kind) = envelope.kind() else {
            debug!(remote = remote.name(), body_type = tag, "unknown body type ignored");
            return Ok(Vec::new());
        };

        let mut actions = Vec::new();
        {
            let ctx = EventContext {
                remote: &*remote,
                buffer,
                event: envelope.event.as_ref(),
                config: &self.config,
            };
            for body in envelope.bodies() {
                handlers::invoke(kind, &ctx, store, body, &mut actions).map_err(|source| {
                    DispatchError::CallbackFailed {
                        remote: remote.name().to_string(),
                        body_type: kind.as_str(),
                        payload: data.to_string(),
                        source,
                    }
                })?;
            }
        }

        if let Some(request) = outbound::sync_request(remote, envelope.code, kind, &self.config) {
            debug!(remote = remote.name(), "sync requested");
            actions.push(Action::Send(request));
        }

        Ok(actions)
    }
}

fn malformed(remote: &Remote, reason: &str, data: &str) -> DispatchError {
    DispatchError::MalformedData {
        remote: remote.name().to_string(),
        reason: reason.to_string(),
        payload: data.to_string(),
    }
}
