use std::{env, net::ToSocketAddrs, time::Duration};

use crate::error::{AgentErr, Result};

const DEFAULT_HEARTBEAT_SECS: u64 = 5;
const DEFAULT_AGENT_NAME: &str = "agent";
const DEFAULT_ADVERTISED_IP: &str = "127.0.0.1";

/// Immutable startup configuration for an agent process.
///
/// Constructed once and injected into the runtime; there is no process-wide
/// configuration state.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Address of the admin service.
    pub server_addr: String,
    /// Period shared by the heartbeat loop, the poll loop and the
    /// registration retry.
    pub heartbeat_dur: Duration,
    /// Name under which the agent registers.
    pub agent_name: String,
    /// Kind of work this node accepts when polling.
    pub worker_type: String,
    /// Address advertised to the admin service for reaching this node.
    pub advertised_ip: String,
}

impl AgentConfig {
    /// Builds a configuration from environment variables.
    ///
    /// `SERVER_ADDR` and `WORKER_TYPE` are required; `HEARTBEAT_SECS`,
    /// `AGENT_NAME` and `ADVERTISED_IP` have defaults.
    ///
    /// # Errors
    /// Returns `AgentErr::Config` when a required variable is missing or a
    /// value fails validation. Configuration errors are fatal at startup.
    pub fn from_env() -> Result<Self> {
        let server_addr = env::var("SERVER_ADDR")
            .map_err(|_| AgentErr::Config("SERVER_ADDR is not set".into()))?;
        let worker_type = env::var("WORKER_TYPE")
            .map_err(|_| AgentErr::Config("WORKER_TYPE is not set".into()))?;

        let heartbeat_secs = match env::var("HEARTBEAT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| AgentErr::Config(format!("invalid HEARTBEAT_SECS: {raw}")))?,
            Err(_) => DEFAULT_HEARTBEAT_SECS,
        };

        let agent_name =
            env::var("AGENT_NAME").unwrap_or_else(|_| DEFAULT_AGENT_NAME.to_string());
        let advertised_ip =
            env::var("ADVERTISED_IP").unwrap_or_else(|_| DEFAULT_ADVERTISED_IP.to_string());

        let config = Self {
            server_addr,
            heartbeat_dur: Duration::from_secs(heartbeat_secs),
            agent_name,
            worker_type,
            advertised_ip,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns `AgentErr::Config` describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self
            .server_addr
            .to_socket_addrs()
            .map(|mut addrs| addrs.next().is_none())
            .unwrap_or(true)
        {
            return Err(AgentErr::Config(format!(
                "server address does not resolve: {}",
                self.server_addr
            )));
        }

        if self.heartbeat_dur.is_zero() {
            return Err(AgentErr::Config(
                "heartbeat interval must be greater than 0".into(),
            ));
        }

        if self.worker_type.is_empty() {
            return Err(AgentErr::Config("worker type is required".into()));
        }

        if self.agent_name.is_empty() {
            return Err(AgentErr::Config("agent name is required".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AgentConfig {
        AgentConfig {
            server_addr: "127.0.0.1:8081".into(),
            heartbeat_dur: Duration::from_secs(5),
            agent_name: "agent-0".into(),
            worker_type: "cpu".into(),
            advertised_ip: "127.0.0.1".into(),
        }
    }

    #[test]
    fn accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_missing_worker_type() {
        let mut config = valid();
        config.worker_type.clear();
        assert!(matches!(config.validate(), Err(AgentErr::Config(_))));
    }

    #[test]
    fn rejects_zero_heartbeat_interval() {
        let mut config = valid();
        config.heartbeat_dur = Duration::ZERO;
        assert!(matches!(config.validate(), Err(AgentErr::Config(_))));
    }

    #[test]
    fn rejects_unresolvable_address() {
        let mut config = valid();
        config.server_addr = "not an address".into();
        assert!(matches!(config.validate(), Err(AgentErr::Config(_))));
    }
}
