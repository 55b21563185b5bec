//! Replay a recorded session and show the resulting mirror.

use anyhow::Result;
use relay_mirror_client::RunSummary;
use relay_mirror_core::{MemoryStore, MirroredBuffer, Remote};
use std::fmt::{self, Write as _};
use std::path::Path;

use crate::config::Config;

/// Run the replay command.
pub async fn run(path: &Path, config: &Config) -> Result<()> {
    let replayed = super::replay_recording(path, config).await?;

    let remote = replayed.session.remote().await;
    let store = replayed.session.store();
    let store = store.lock().await;

    print!(
        "{}",
        render(&remote, &replayed.summary, &store, &replayed.transport.sent_messages())?
    );
    Ok(())
}

/// Human-readable dump of a replayed mirror.
pub fn render(
    remote: &Remote,
    summary: &RunSummary,
    store: &MemoryStore,
    sent: &[String],
) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "=== mirror-cli replay ===")?;
    writeln!(out)?;
    writeln!(
        out,
        "Remote:   {} ({})",
        remote.name(),
        if remote.is_synced() { "synced" } else { "not synced" }
    )?;
    writeln!(
        out,
        "Messages: {} received, {} dropped",
        summary.received, summary.dropped
    )?;
    writeln!(out, "Buffers:  {}", store.len())?;

    for (_, buffer) in store.buffers() {
        writeln!(out)?;
        render_buffer(&mut out, buffer)?;
    }

    writeln!(out)?;
    writeln!(out, "Sent ({}):", sent.len())?;
    for request in sent {
        writeln!(out, "  {}", request)?;
    }

    Ok(out)
}

fn render_buffer(out: &mut String, buffer: &MirroredBuffer) -> fmt::Result {
    writeln!(out, "Buffer {}", buffer.full_name())?;
    for (property, value) in buffer.properties() {
        writeln!(out, "  {} = {}", property, value)?;
    }

    if buffer.row_count() > 0 {
        writeln!(out, "  rows:")?;
        for (y, line) in buffer.rows() {
            writeln!(out, "    {:>3}: {}", y, line.text.replace('\t', " "))?;
        }
    }

    if !buffer.lines().is_empty() {
        writeln!(out, "  lines:")?;
        for line in buffer.lines() {
            writeln!(out, "    [{}] {}", line.timestamp, line.text.replace('\t', " "))?;
        }
    }

    let nicklist = buffer.nicklist();
    if nicklist.group_count() + nicklist.nick_count() > 0 {
        writeln!(out, "  nicklist:")?;
        for entry in nicklist.outline() {
            writeln!(out, "    {}", entry)?;
        }
    }
    Ok(())
}
