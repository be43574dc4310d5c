use std::sync::{
    OnceLock,
    atomic::{AtomicU64, Ordering},
};

/// Shared registration state for one agent process.
///
/// The node id is assigned at most once, on successful registration; the
/// heartbeat and poll loops only ever read it.
#[derive(Debug, Default)]
pub struct AgentSession {
    node_id: OnceLock<String>,
    /// Unix millis of the latest acknowledged heartbeat, 0 when none yet.
    last_heartbeat_at: AtomicU64,
}

impl AgentSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the server-assigned node id.
    ///
    /// # Returns
    /// `false` if an id was already assigned; the existing id is kept.
    pub fn set_node_id(&self, node_id: String) -> bool {
        self.node_id.set(node_id).is_ok()
    }

    /// The node id, once registration has completed.
    pub fn node_id(&self) -> Option<&str> {
        self.node_id.get().map(String::as_str)
    }

    /// Records the timestamp of the latest acknowledged heartbeat.
    #[inline]
    pub fn record_heartbeat(&self, at: u64) {
        self.last_heartbeat_at.store(at, Ordering::Relaxed);
    }

    /// Unix millis of the latest acknowledged heartbeat, if any.
    pub fn last_heartbeat_at(&self) -> Option<u64> {
        match self.last_heartbeat_at.load(Ordering::Relaxed) {
            0 => None,
            at => Some(at),
        }
    }
}
