//! Remote identity and sync state.

/// A remote relay being mirrored.
///
/// Owned by the connection layer. The core reads the name and flips
/// `synced` once the first buffer snapshot has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    name: String,
    synced: bool,
}

impl Remote {
    /// Create an unsynced remote.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            synced: false,
        }
    }

    /// Name identifying this remote locally.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once the sync request has been emitted.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Record that the sync request has been emitted.
    pub fn mark_synced(&mut self) {
        self.synced = true;
    }

    /// Forget the sync state.
    ///
    /// Called by the connection layer after a reconnect so that the next
    /// buffer snapshot triggers a fresh sync request.
    pub fn reset_sync(&mut self) {
        self.synced = false;
    }
}
