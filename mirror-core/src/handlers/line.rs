//! Line appender.

use relay_mirror_types::LineBody;
use serde_json::Value;
use tracing::trace;

use super::{lenient, EventContext};
use crate::error::HandlerResult;
use crate::store::{BufferStore, LinePosition, RenderedLine};
use crate::time::Timestamp;

/// Handle a `line` body: print it on the event's buffer.
///
/// Without a bound buffer the line is ignored.
pub fn handle<S: BufferStore>(
    ctx: &EventContext<'_, S::Buffer>,
    store: &mut S,
    body: Option<&Value>,
) -> HandlerResult {
    let Some(buffer) = ctx.buffer else {
        trace!(remote = ctx.remote.name(), "line for unknown buffer ignored");
        return Ok(());
    };
    let line: LineBody = lenient(body, LineBody::from_value);
    append(store, buffer, &line);
    Ok(())
}

/// Print one line on `buffer`.
pub fn append<S: BufferStore>(store: &mut S, buffer: S::Buffer, line: &LineBody) {
    store.print(buffer, &render(line));
}

/// Turn a line body into what gets printed.
pub fn render(line: &LineBody) -> RenderedLine {
    let message = line.message.as_deref().unwrap_or("");
    let text = match line.prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => format!("{}\t{}", prefix, message),
        _ => message.to_string(),
    };

    RenderedLine {
        timestamp: Timestamp::parse_or_epoch(line.date.as_deref()),
        position: LinePosition::from_y(line.y),
        tags: line.tags.join(","),
        text,
    }
}
