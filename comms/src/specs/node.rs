use serde::{Deserialize, Serialize};

/// Identity of a worker host, gathered once at agent startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Hostname as reported by the operating system.
    pub host_name: String,
    /// CPU architecture the agent was built for.
    pub arch: String,
    /// Address other services should use to reach this node.
    pub ip_addr: String,
}
