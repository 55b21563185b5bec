//! CLI command implementations.

pub mod input;
pub mod replay;

use anyhow::{Context, Result};
use relay_mirror_client::{MockTransport, RemoteSession, RunSummary};
use relay_mirror_core::MemoryStore;
use std::path::Path;
use tracing::info;

use crate::config::Config;

/// A session fed from a recording, after it ran to the end.
pub struct Replayed {
    /// The session, holding the mirrored state.
    pub session: RemoteSession<MockTransport, MemoryStore>,
    /// Transport handle, for inspecting what was sent.
    pub transport: MockTransport,
    /// Counters of the run.
    pub summary: RunSummary,
}

/// Read a recording: one JSON message per line, blank lines skipped.
pub async fn read_recording(path: &Path) -> Result<Vec<String>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read recording {}", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

/// Feed a recording through a fresh session over the mock transport.
pub async fn replay_recording(path: &Path, config: &Config) -> Result<Replayed> {
    let messages = read_recording(path).await?;
    info!(file = %path.display(), messages = messages.len(), "replaying recording");

    let transport = MockTransport::new();
    for message in &messages {
        transport.queue_message(message);
    }

    let session = RemoteSession::new(
        &config.remote.name,
        &config.remote.address,
        config.mirror.clone(),
        transport.clone(),
        MemoryStore::new(),
    );
    session.connect().await.context("Failed to connect")?;
    let summary = session.run().await.context("Replay aborted")?;

    Ok(Replayed {
        session,
        transport,
        summary,
    })
}
