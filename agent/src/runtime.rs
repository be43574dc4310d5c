use std::sync::Arc;

use comms::specs::{NodeInfo, RunnableActionInstance};
use log::{debug, info, warn};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc,
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::AgentConfig,
    error::Result,
    metrics::AgentMetrics,
    net::AdminClient,
    retry::FixedInterval,
    session::AgentSession,
};

/// Orchestrates the agent lifecycle.
///
/// Registration runs first and retries indefinitely at the heartbeat
/// interval; only once a node id has been assigned do the heartbeat and
/// poll loops start, as two independently scheduled tasks sharing the admin
/// channel. A single cancellation token unwinds everything within one
/// period.
pub struct AgentRuntime<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    config: AgentConfig,
    node: NodeInfo,
    session: Arc<AgentSession>,
    client: Arc<AdminClient<R, W>>,
    metrics: Arc<AgentMetrics>,
}

impl<R, W> AgentRuntime<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Creates a runtime from validated configuration.
    ///
    /// # Arguments
    /// * `config` - Startup configuration; validated here, so an invalid
    ///   config is rejected before anything is spawned.
    /// * `node` - Identity of the local node.
    /// * `client` - Channel to the admin service.
    ///
    /// # Errors
    /// Returns `AgentErr::Config` when validation fails.
    pub fn new(config: AgentConfig, node: NodeInfo, client: AdminClient<R, W>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            node,
            session: Arc::new(AgentSession::new()),
            client: Arc::new(client),
            metrics: Arc::new(AgentMetrics::default()),
        })
    }

    /// Shared registration state, for callers that need the node id.
    pub fn session(&self) -> Arc<AgentSession> {
        Arc::clone(&self.session)
    }

    /// Runtime counters, readable while the loops run and after shutdown.
    pub fn metrics(&self) -> Arc<AgentMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Runs the full lifecycle until cancellation.
    ///
    /// # Arguments
    /// * `actions` - Destination for polled action instances; execution is
    ///   delegated to whatever consumes the channel.
    /// * `cancel` - Cooperative shutdown signal for all loops.
    ///
    /// # Returns
    /// `Ok(())` on clean shutdown. Transient RPC failures never surface
    /// here; they are logged and absorbed by the loops.
    pub async fn run(
        self,
        actions: mpsc::Sender<Vec<RunnableActionInstance>>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let retry = FixedInterval::new(self.config.heartbeat_dur);

        if !self.register(&retry, &cancel).await? {
            info!("cancelled before registration completed");
            return Ok(());
        }

        let mut loops = JoinSet::new();
        loops.spawn(heartbeat_loop(
            Arc::clone(&self.client),
            Arc::clone(&self.session),
            retry.clone(),
            cancel.clone(),
            Arc::clone(&self.metrics),
        ));
        loops.spawn(poll_loop(
            Arc::clone(&self.client),
            Arc::clone(&self.session),
            self.config.worker_type.clone(),
            self.node.arch.clone(),
            actions,
            retry,
            cancel,
            Arc::clone(&self.metrics),
        ));

        while let Some(joined) = loops.join_next().await {
            joined.map_err(std::io::Error::other)?;
        }

        info!(
            heartbeats = self.metrics.heartbeats(),
            polls = self.metrics.polls();
            "agent loops stopped"
        );
        Ok(())
    }

    /// Registration retry loop. Retries at the shared interval until the
    /// admin service assigns a node id, with no attempt cap.
    ///
    /// # Returns
    /// `Ok(true)` once registered, `Ok(false)` when cancelled first.
    async fn register(&self, retry: &FixedInterval, cancel: &CancellationToken) -> Result<bool> {
        loop {
            if cancel.is_cancelled() {
                return Ok(false);
            }

            self.metrics.bump_registration_attempt();
            match self
                .client
                .register(&self.node, &self.config.agent_name)
                .await
            {
                Ok(node_id) => {
                    info!(node_id = node_id.as_str(); "registered with admin service");
                    if !self.session.set_node_id(node_id) {
                        warn!("node id was already assigned, keeping the first one");
                    }
                    return Ok(true);
                }
                Err(e) => {
                    warn!("registration failed, retrying next interval: {e}");
                    if !retry.pause(cancel).await {
                        return Ok(false);
                    }
                }
            }
        }
    }
}

/// Periodic liveness loop. Failures are logged and absorbed; the loop only
/// exits on cancellation.
async fn heartbeat_loop<R, W>(
    client: Arc<AdminClient<R, W>>,
    session: Arc<AgentSession>,
    retry: FixedInterval,
    cancel: CancellationToken,
    metrics: Arc<AgentMetrics>,
) where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    loop {
        if !retry.pause(&cancel).await {
            info!("heartbeat loop stopping");
            break;
        }

        // Should not happen once registration completed, but guard against
        // a tick racing the node id write.
        let Some(node_id) = session.node_id() else {
            warn!("skipping heartbeat, node id not assigned yet");
            continue;
        };

        let at = comms::unix_millis();
        match client.heartbeat(node_id, at).await {
            Ok(()) => {
                session.record_heartbeat(at);
                metrics.bump_heartbeat();
                debug!(node_id = node_id; "heartbeat acknowledged");
            }
            Err(e) => {
                metrics.bump_heartbeat_failure();
                warn!("heartbeat failed: {e}");
            }
        }
    }
}

/// Periodic work-polling loop, concurrent with the heartbeat loop on the
/// same period. Polled instances are handed off for execution elsewhere.
async fn poll_loop<R, W>(
    client: Arc<AdminClient<R, W>>,
    session: Arc<AgentSession>,
    worker_type: String,
    arch: String,
    actions: mpsc::Sender<Vec<RunnableActionInstance>>,
    retry: FixedInterval,
    cancel: CancellationToken,
    metrics: Arc<AgentMetrics>,
) where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    loop {
        if !retry.pause(&cancel).await {
            info!("poll loop stopping");
            break;
        }

        if session.node_id().is_none() {
            warn!("skipping poll, node id not assigned yet");
            continue;
        }

        match client.runnable_actions(&worker_type, &arch).await {
            Ok(instances) => {
                metrics.bump_poll();
                if instances.is_empty() {
                    continue;
                }

                metrics.add_actions(instances.len());
                debug!(count = instances.len(); "received runnable action instances");
                if actions.send(instances).await.is_err() {
                    warn!("action executor channel closed, dropping instances");
                }
            }
            Err(e) => {
                metrics.bump_poll_failure();
                warn!("poll failed: {e}");
            }
        }
    }
}
