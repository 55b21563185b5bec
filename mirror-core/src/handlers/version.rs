//! Version handler.

use relay_mirror_types::VersionBody;
use serde_json::Value;

use super::{lenient, EventContext};
use crate::action::Action;
use crate::error::HandlerResult;

/// Handle a `version` body: report the remote version as a status line.
///
/// Missing fields print as empty strings.
pub fn handle<B>(
    ctx: &EventContext<'_, B>,
    body: Option<&Value>,
    actions: &mut Vec<Action>,
) -> HandlerResult {
    let version: VersionBody = lenient(body, VersionBody::from_value);
    actions.push(Action::Status(status_line(ctx.remote.name(), &version)));
    Ok(())
}

fn status_line(remote: &str, version: &VersionBody) -> String {
    format!(
        "remote[{}]: WeeChat: {} ({}), API: {}",
        remote,
        version.weechat_version.as_deref().unwrap_or(""),
        version.weechat_version_git.as_deref().unwrap_or(""),
        version.relay_api_version.as_deref().unwrap_or("")
    )
}
