use std::io;

use agent::{AdminClient, AgentConfig, AgentRuntime, local_node};
use log::{error, info};
use tokio::{net::TcpStream, signal, sync::mpsc};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let config = match AgentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return Err(io::Error::from(e));
        }
    };

    let node = local_node(config.advertised_ip.clone());
    info!(
        host = node.host_name.as_str(),
        arch = node.arch.as_str(),
        server = config.server_addr.as_str();
        "starting agent"
    );

    let stream = TcpStream::connect(&config.server_addr).await?;
    let (rx, tx) = stream.into_split();
    let (rx, tx) = comms::channel(rx, tx);
    let client = AdminClient::new(rx, tx);

    // Execution of polled instances is delegated to an external runner;
    // this process only surfaces what arrived.
    let (action_tx, mut action_rx) = mpsc::channel::<Vec<comms::specs::RunnableActionInstance>>(8);
    tokio::spawn(async move {
        while let Some(batch) = action_rx.recv().await {
            for instance in &batch {
                info!(
                    id = instance.id.as_str(),
                    action_id = instance.action_id.as_str(),
                    command = instance.command.as_str();
                    "runnable action instance"
                );
            }
        }
    });

    let cancel = CancellationToken::new();
    let runtime = AgentRuntime::new(config, node, client).map_err(io::Error::from)?;
    let metrics = runtime.metrics();

    let mut run = tokio::spawn(runtime.run(action_tx, cancel.clone()));
    tokio::select! {
        joined = &mut run => {
            joined.map_err(io::Error::other)??;
            info!("agent runtime finished");
            return Ok(());
        }
        _ = signal::ctrl_c() => {
            info!("received shutdown signal, stopping loops");
            cancel.cancel();
        }
    }

    run.await.map_err(io::Error::other)??;
    info!(
        heartbeats = metrics.heartbeats(),
        polls = metrics.polls();
        "agent stopped cleanly"
    );

    Ok(())
}
