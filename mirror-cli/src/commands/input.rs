//! Replay a recorded session, then relay input typed in one buffer.

use anyhow::{Context, Result};
use relay_mirror_core::BufferStore;
use relay_mirror_types::BufferId;
use std::path::Path;

use crate::config::Config;

/// Run the input command: print the request that would go upstream.
pub async fn run(path: &Path, config: &Config, buffer_id: i64, text: &str) -> Result<()> {
    let replayed = super::replay_recording(path, config).await?;

    let buffer = {
        let store = replayed.session.store();
        let store = store.lock().await;
        store
            .find_buffer(&config.remote.name, BufferId::new(buffer_id))
            .with_context(|| format!("No mirrored buffer with remote id {}", buffer_id))?
    };

    if !replayed.session.submit_input(buffer, text).await? {
        anyhow::bail!("Buffer {} has no remote id, input dropped", buffer_id);
    }

    let request = replayed
        .transport
        .last_sent()
        .context("Nothing was sent")?;
    println!("{}", request);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const RECORDING: &str = r##"{"code":200,"body_type":"buffer","body":{"id":2,"name":"irc.libera.#rust"}}"##;

    #[tokio::test]
    async fn input_to_known_buffer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        std::fs::write(&path, RECORDING).unwrap();

        let result = run(&path, &Config::default(), 2, "hello").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn input_to_unknown_buffer_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        std::fs::write(&path, RECORDING).unwrap();

        let result = run(&path, &Config::default(), 99, "hello").await;
        assert!(result.is_err());
    }
}
