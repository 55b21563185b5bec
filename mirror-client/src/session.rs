//! RemoteSession - drives the mirror of one remote.
//!
//! The session owns the transport and interprets the actions produced by
//! mirror-core: requests are serialized and sent, status lines are logged.
//!
//! ```text
//! Transport → RemoteSession → Dispatcher (pure) → store
//!                  ↑                ↓
//!                  └──── actions ───┘
//! ```
//!
//! Each message is applied to the store in full while the store lock is
//! held; the lock is released before any request goes out.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use relay_mirror_core::{input_request, Action, Dispatcher, MirrorConfig, NicklistStore, Remote};
use relay_mirror_types::WireError;

use crate::transport::{Transport, TransportError};

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] WireError),

    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// Counters for one [`RemoteSession::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Messages received.
    pub received: usize,
    /// Messages dropped with an error.
    pub dropped: usize,
    /// Requests sent.
    pub sent: usize,
}

/// Session mirroring one remote into a store.
pub struct RemoteSession<T: Transport, S> {
    dispatcher: Dispatcher,
    address: String,
    transport: T,
    remote: Arc<Mutex<Remote>>,
    store: Arc<Mutex<S>>,
}

impl<T: Transport, S: NicklistStore> RemoteSession<T, S> {
    /// Create a session for remote `name` reachable at `address`.
    pub fn new(name: &str, address: &str, config: MirrorConfig, transport: T, store: S) -> Self {
        Self {
            dispatcher: Dispatcher::new(config),
            address: address.to_string(),
            transport,
            remote: Arc::new(Mutex::new(Remote::new(name))),
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Connect the transport.
    ///
    /// The sync state is reset, so the first buffer snapshot received on
    /// this connection requests a sync again.
    pub async fn connect(&self) -> Result<(), ClientError> {
        self.transport
            .connect(&self.address)
            .await
            .map_err(|e| ClientError::ConnectionFailed(e.to_string()))?;

        let mut remote = self.remote.lock().await;
        remote.reset_sync();
        info!(remote = remote.name(), address = %self.address, "connected");
        Ok(())
    }

    /// Close the transport.
    pub async fn disconnect(&self) -> Result<(), ClientError> {
        self.transport.close().await?;
        Ok(())
    }

    /// Apply one message and carry out the resulting actions.
    ///
    /// A message the core rejects is logged and dropped; only transport
    /// and serialization failures are returned.
    pub async fn handle_message(&self, data: &str) -> Result<Vec<Action>, ClientError> {
        Ok(self.apply(data).await?.unwrap_or_default())
    }

    /// Receive and apply messages until the connection closes.
    pub async fn run(&self) -> Result<RunSummary, ClientError> {
        let mut summary = RunSummary::default();

        loop {
            let data = match self.transport.recv().await {
                Ok(data) => data,
                Err(TransportError::ConnectionClosed) => {
                    debug!("connection closed");
                    break;
                }
                Err(e) => return Err(e.into()),
            };
            summary.received += 1;

            match self.apply(&data).await? {
                Some(actions) => {
                    summary.sent += actions.iter().filter_map(Action::as_request).count();
                }
                None => summary.dropped += 1,
            }
        }

        Ok(summary)
    }

    /// Relay text typed in a mirrored buffer.
    ///
    /// Returns `false` if the buffer has no remote id and the input was
    /// dropped.
    pub async fn submit_input(&self, buffer: S::Buffer, text: &str) -> Result<bool, ClientError> {
        let request = {
            let store = self.store.lock().await;
            input_request(&*store, buffer, text)
        };
        match request {
            Some(request) => {
                self.execute(&Action::Send(request)).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Shared handle to the store.
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// Snapshot of the remote state.
    pub async fn remote(&self) -> Remote {
        self.remote.lock().await.clone()
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Dispatch one message and carry out its actions.
    ///
    /// `None` if the core rejected the message; it is logged and dropped.
    async fn apply(&self, data: &str) -> Result<Option<Vec<Action>>, ClientError> {
        let outcome = {
            let mut remote = self.remote.lock().await;
            let mut store = self.store.lock().await;
            self.dispatcher.recv(&mut remote, &mut *store, data)
        };

        let actions = match outcome {
            Ok(actions) => actions,
            Err(e) => {
                error!("{}", e);
                return Ok(None);
            }
        };

        for action in &actions {
            self.execute(action).await?;
        }
        Ok(Some(actions))
    }

    /// Carry out one action.
    async fn execute(&self, action: &Action) -> Result<(), ClientError> {
        match action {
            Action::Send(request) => {
                let json = request.to_json()?;
                debug!(request = %json, "send to remote");
                self.transport.send(&json).await?;
            }
            Action::Status(text) => info!("{}", text),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use relay_mirror_core::{BufferStore, MemoryStore};
    use relay_mirror_types::{BufferId, Request};

    const SNAPSHOT: &str = r##"{"code":200,"body_type":"buffer","body":[{"id":1,"name":"#a"},{"id":2,"name":"#b"}]}"##;

    fn session(transport: &MockTransport) -> RemoteSession<MockTransport, MemoryStore> {
        RemoteSession::new(
            "home",
            "wss://relay:9000/api",
            MirrorConfig::default(),
            transport.clone(),
            MemoryStore::new(),
        )
    }

    fn sent_requests(transport: &MockTransport) -> Vec<Request> {
        transport
            .sent_messages()
            .iter()
            .map(|m| Request::from_json(m).unwrap())
            .collect()
    }

    // ===========================================
    // Connection Tests
    // ===========================================

    #[tokio::test]
    async fn connect_uses_address() {
        let transport = MockTransport::new();
        let session = session(&transport);

        session.connect().await.unwrap();

        assert!(transport.is_connected());
        assert_eq!(
            transport.connected_address().as_deref(),
            Some("wss://relay:9000/api")
        );
    }

    #[tokio::test]
    async fn connect_failure_is_reported() {
        let transport = MockTransport::new();
        transport.fail_next_connect("refused");
        let session = session(&transport);

        let result = session.connect().await;
        assert!(matches!(result, Err(ClientError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn reconnect_resyncs() {
        let transport = MockTransport::new();
        let session = session(&transport);
        session.connect().await.unwrap();
        session.handle_message(SNAPSHOT).await.unwrap();
        assert!(session.remote().await.is_synced());

        session.disconnect().await.unwrap();
        session.connect().await.unwrap();
        assert!(!session.remote().await.is_synced());

        session.handle_message(SNAPSHOT).await.unwrap();
        assert_eq!(
            sent_requests(&transport),
            vec![Request::sync("weechat"), Request::sync("weechat")]
        );
    }

    // ===========================================
    // Message Handling Tests
    // ===========================================

    #[tokio::test]
    async fn snapshot_sends_one_sync() {
        let transport = MockTransport::new();
        let session = session(&transport);
        session.connect().await.unwrap();

        session.handle_message(SNAPSHOT).await.unwrap();
        session.handle_message(SNAPSHOT).await.unwrap();

        assert_eq!(sent_requests(&transport), vec![Request::sync("weechat")]);
        assert_eq!(session.store().lock().await.len(), 2);
    }

    #[tokio::test]
    async fn bad_message_is_dropped() {
        let transport = MockTransport::new();
        let session = session(&transport);
        session.connect().await.unwrap();

        let actions = session.handle_message("{oops").await.unwrap();
        assert!(actions.is_empty());
        assert!(transport.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn send_failure_is_returned() {
        let transport = MockTransport::new();
        let session = session(&transport);
        session.connect().await.unwrap();
        transport.fail_next_send("broken pipe");

        let result = session.handle_message(SNAPSHOT).await;
        assert!(matches!(
            result,
            Err(ClientError::Transport(TransportError::SendFailed(_)))
        ));
    }

    #[tokio::test]
    async fn version_status_is_returned() {
        let transport = MockTransport::new();
        let session = session(&transport);
        session.connect().await.unwrap();

        let actions = session
            .handle_message(r#"{"code":200,"body_type":"version","body":{"weechat_version":"4.3.0"}}"#)
            .await
            .unwrap();

        assert!(matches!(&actions[..], [Action::Status(text)] if text.contains("WeeChat: 4.3.0")));
        assert!(transport.sent_messages().is_empty());
    }

    // ===========================================
    // Run Loop Tests
    // ===========================================

    #[tokio::test]
    async fn run_until_closed() {
        let transport = MockTransport::new();
        let session = session(&transport);
        session.connect().await.unwrap();
        transport.queue_message(SNAPSHOT);
        transport.queue_message("not json");
        transport.queue_message(
            r#"{"code":0,"body_type":"line","event":{"name":"buffer_line_added","buffer_id":1},"body":{"message":"hello"}}"#,
        );

        let summary = session.run().await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                received: 3,
                dropped: 1,
                sent: 1
            }
        );
        let store = session.store();
        let store = store.lock().await;
        let local = store.find_buffer("home", BufferId::new(1)).unwrap();
        assert_eq!(store.buffer(local).unwrap().lines()[0].text, "hello");
    }

    #[tokio::test]
    async fn run_stops_on_receive_failure() {
        let transport = MockTransport::new();
        let session = session(&transport);
        session.connect().await.unwrap();
        transport.fail_next_recv("reset by peer");

        let result = session.run().await;
        assert!(matches!(
            result,
            Err(ClientError::Transport(TransportError::ReceiveFailed(_)))
        ));
    }

    // ===========================================
    // Input Tests
    // ===========================================

    #[tokio::test]
    async fn input_goes_to_remote_buffer() {
        let transport = MockTransport::new();
        let session = session(&transport);
        session.connect().await.unwrap();
        session.handle_message(SNAPSHOT).await.unwrap();

        let local = session
            .store()
            .lock()
            .await
            .find_buffer("home", BufferId::new(2))
            .unwrap();
        assert!(session.submit_input(local, "hello #b").await.unwrap());

        assert_eq!(
            sent_requests(&transport).last(),
            Some(&Request::input(BufferId::new(2), "hello #b"))
        );
    }

    #[tokio::test]
    async fn input_without_remote_id_is_dropped() {
        use relay_mirror_core::BufferProperty;

        let transport = MockTransport::new();
        let session = session(&transport);
        session.connect().await.unwrap();
        session.handle_message(SNAPSHOT).await.unwrap();
        let before = transport.sent_messages().len();

        let store = session.store();
        let local = {
            let mut store = store.lock().await;
            let local = store.find_buffer("home", BufferId::new(1)).unwrap();
            store.set_property(local, &BufferProperty::RelayRemoteId, None);
            local
        };

        assert!(!session.submit_input(local, "lost").await.unwrap());
        assert_eq!(transport.sent_messages().len(), before);
    }
}
