use std::io;

use comms::{
    Receiver, Sender,
    msg::{AdminRequest, AdminResponse},
    specs::{ActionStatusUpdate, NodeInfo, RunnableActionInstance},
};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::Mutex,
};

/// Admin service client wrapper.
///
/// One request/response exchange is in flight per channel at a time; the
/// heartbeat and poll loops share a client through the internal lock, so a
/// slow response to one call delays the other loop's tick rather than
/// corrupting the stream.
pub struct AdminClient<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    chan: Mutex<Chan<R, W>>,
}

struct Chan<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    rx: Receiver<R>,
    tx: Sender<W>,
}

impl<R, W> AdminClient<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(rx: Receiver<R>, tx: Sender<W>) -> Self {
        Self {
            chan: Mutex::new(Chan { rx, tx }),
        }
    }

    /// Registers this node with the admin service.
    ///
    /// # Arguments
    /// * `node_info` - Identity of the local node.
    /// * `agent_name` - Name under which the agent registers.
    ///
    /// # Returns
    /// The server-assigned node id.
    pub async fn register(&self, node_info: &NodeInfo, agent_name: &str) -> io::Result<String> {
        let req = AdminRequest::RegisterAgent {
            node_info: node_info.clone(),
            agent_name: agent_name.to_string(),
        };

        match self.call(&req).await? {
            AdminResponse::Registered { node_id } => Ok(node_id),
            other => Self::unexpected(other),
        }
    }

    /// Sends a liveness heartbeat.
    ///
    /// # Arguments
    /// * `node_id` - The id assigned at registration.
    /// * `at` - Unix millis of the heartbeat.
    pub async fn heartbeat(&self, node_id: &str, at: u64) -> io::Result<()> {
        let req = AdminRequest::Heartbeat {
            node_id: node_id.to_string(),
            at,
        };

        match self.call(&req).await? {
            AdminResponse::Ack => Ok(()),
            other => Self::unexpected(other),
        }
    }

    /// Fetches action instances runnable on this node.
    ///
    /// # Arguments
    /// * `worker_type` - Kind of work this node accepts.
    /// * `arch` - CPU architecture of this node.
    pub async fn runnable_actions(
        &self,
        worker_type: &str,
        arch: &str,
    ) -> io::Result<Vec<RunnableActionInstance>> {
        let req = AdminRequest::GetRunnableActionInstances {
            worker_type: worker_type.to_string(),
            arch: arch.to_string(),
        };

        match self.call(&req).await? {
            AdminResponse::RunnableActions { instances } => Ok(instances),
            other => Self::unexpected(other),
        }
    }

    /// Reports one observed action-instance transition.
    pub async fn update_action_status(&self, update: &ActionStatusUpdate) -> io::Result<()> {
        let req = AdminRequest::UpdateActionStatus {
            update: update.clone(),
        };

        match self.call(&req).await? {
            AdminResponse::Ack => Ok(()),
            other => Self::unexpected(other),
        }
    }

    async fn call(&self, req: &AdminRequest) -> io::Result<AdminResponse> {
        let mut chan = self.chan.lock().await;
        chan.tx.send(req).await?;
        chan.rx.recv().await
    }

    fn unexpected<T>(response: AdminResponse) -> io::Result<T> {
        if let AdminResponse::Err { detail } = response {
            return Err(io::Error::other(detail));
        }

        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unexpected response: {response:?}"),
        ))
    }
}
