use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

/// Fixed-interval retry policy shared by registration, heartbeat and poll.
///
/// Deliberately has no attempt cap, no backoff growth and no jitter: failed
/// attempts are simply spaced one interval apart until cancellation.
#[derive(Debug, Clone)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    /// Creates a new policy.
    ///
    /// # Arguments
    /// * `interval` - The pause between attempts / periodic ticks.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleeps one full interval, waking early on cancellation.
    ///
    /// # Returns
    /// `true` when the interval elapsed, `false` when the token fired first.
    pub async fn pause(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = time::sleep(self.interval) => true,
        }
    }
}
