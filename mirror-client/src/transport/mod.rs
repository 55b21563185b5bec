//! Transport abstraction for the relay mirror.
//!
//! The relay API speaks JSON text messages over an established connection
//! (typically a websocket). The transport hands over each decoded message
//! as text; framing, TLS and authentication live below this trait.
//!
//! # Design
//!
//! The transport trait is async and connection-oriented:
//! - `connect()` establishes a connection
//! - `send()` transmits one JSON request
//! - `recv()` receives one JSON message
//! - `close()` gracefully terminates
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new();
//! transport.connect("wss://relay.example:9000/api").await?;
//! transport.send(r#"{"request":"POST /api/sync","body":{"colors":"weechat"}}"#).await?;
//! let message = transport.recv().await?;
//! ```

mod mock;

pub use mock::MockTransport;

use async_trait::async_trait;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Not connected.
    #[error("not connected")]
    NotConnected,

    /// Connection closed.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Transport trait for exchanging relay API messages.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to the relay at `address`.
    async fn connect(&self, address: &str) -> Result<(), TransportError>;

    /// Send one JSON request.
    async fn send(&self, data: &str) -> Result<(), TransportError>;

    /// Receive one JSON message.
    ///
    /// Blocks until a message is available or the connection closes.
    async fn recv(&self) -> Result<String, TransportError>;

    /// Check if currently connected.
    fn is_connected(&self) -> bool;

    /// Close the connection gracefully.
    async fn close(&self) -> Result<(), TransportError>;
}
