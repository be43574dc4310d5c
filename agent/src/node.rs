use std::env;

use comms::specs::NodeInfo;

/// Gathers the immutable identity of the local node.
///
/// # Arguments
/// * `advertised_ip` - Address the admin service should use to reach the
///   node; comes from configuration, not interface discovery.
///
/// # Returns
/// A `NodeInfo` describing this host.
pub fn local_node(advertised_ip: String) -> NodeInfo {
    let host_name = hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());

    NodeInfo {
        host_name,
        arch: env::consts::ARCH.to_string(),
        ip_addr: advertised_ip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_carries_build_arch() {
        let node = local_node("10.0.0.9".into());
        assert_eq!(node.arch, env::consts::ARCH);
        assert_eq!(node.ip_addr, "10.0.0.9");
        assert!(!node.host_name.is_empty());
    }
}
