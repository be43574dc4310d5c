use std::sync::Arc;

use comms::specs::ActionStatusUpdate;
use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::net::AdminClient;

/// Fire-and-forget reporter for action-instance transitions.
///
/// Each observed transition is sent exactly once; a failed send is logged
/// and dropped, never queued or retried. A dropped update is only
/// detectable server-side through staleness.
pub struct StatusReporter<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    client: Arc<AdminClient<R, W>>,
}

impl<R, W> StatusReporter<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(client: Arc<AdminClient<R, W>>) -> Self {
        Self { client }
    }

    /// Sends one status update.
    ///
    /// # Arguments
    /// * `update` - The observed transition.
    pub async fn report(&self, update: ActionStatusUpdate) {
        match self.client.update_action_status(&update).await {
            Ok(()) => {
                debug!(instance_id = update.instance_id.as_str(); "status update sent");
            }
            Err(e) => {
                warn!(
                    instance_id = update.instance_id.as_str();
                    "status update dropped: {e}"
                );
            }
        }
    }
}

impl<R, W> Clone for StatusReporter<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}
