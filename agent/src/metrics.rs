use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by the agent runtime.
///
/// Shared between the heartbeat and poll loops, so everything is atomic;
/// counts are read after shutdown or for observability.
#[derive(Debug, Default)]
pub struct AgentMetrics {
    registration_attempts: AtomicU64,
    heartbeats: AtomicU64,
    heartbeat_failures: AtomicU64,
    polls: AtomicU64,
    poll_failures: AtomicU64,
    actions_received: AtomicU64,
}

impl AgentMetrics {
    #[inline]
    pub fn bump_registration_attempt(&self) {
        self.registration_attempts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn bump_heartbeat(&self) {
        self.heartbeats.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn bump_heartbeat_failure(&self) {
        self.heartbeat_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn bump_poll(&self) {
        self.polls.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn bump_poll_failure(&self) {
        self.poll_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_actions(&self, n: usize) {
        self.actions_received.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn registration_attempts(&self) -> u64 {
        self.registration_attempts.load(Ordering::Relaxed)
    }

    pub fn heartbeats(&self) -> u64 {
        self.heartbeats.load(Ordering::Relaxed)
    }

    pub fn heartbeat_failures(&self) -> u64 {
        self.heartbeat_failures.load(Ordering::Relaxed)
    }

    pub fn polls(&self) -> u64 {
        self.polls.load(Ordering::Relaxed)
    }

    pub fn poll_failures(&self) -> u64 {
        self.poll_failures.load(Ordering::Relaxed)
    }

    pub fn actions_received(&self) -> u64 {
        self.actions_received.load(Ordering::Relaxed)
    }
}
