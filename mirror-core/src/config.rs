//! Mirror configuration.
//!
//! Deserializable from any serde format; file loading lives with the
//! binaries, not here.

use serde::Deserialize;

/// Tunables for one mirrored remote.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MirrorConfig {
    /// Color scheme requested in the sync handshake (default: `weechat`).
    #[serde(default = "default_sync_colors")]
    pub sync_colors: String,
    /// First component of local buffer names (default: `remote`).
    #[serde(default = "default_buffer_name_prefix")]
    pub buffer_name_prefix: String,
    /// Nick group nesting beyond this depth is dropped (default: 64).
    #[serde(default = "default_max_nicklist_depth")]
    pub max_nicklist_depth: usize,
}

// Default value functions
fn default_sync_colors() -> String {
    "weechat".to_string()
}

fn default_buffer_name_prefix() -> String {
    "remote".to_string()
}

fn default_max_nicklist_depth() -> usize {
    64
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            sync_colors: default_sync_colors(),
            buffer_name_prefix: default_buffer_name_prefix(),
            max_nicklist_depth: default_max_nicklist_depth(),
        }
    }
}

impl MirrorConfig {
    /// Local full name for a remote buffer: `<prefix>.<remote>.<name>`.
    pub fn full_buffer_name(&self, remote: &str, name: &str) -> String {
        format!("{}.{}.{}", self.buffer_name_prefix, remote, name)
    }
}
