//! Local interface address discovery.

use std::net::IpAddr;

use sysinfo::Networks;

/// Source of the addresses assigned to local network interfaces.
pub trait LocalAddressProvider: Send + Sync {
    /// All interface addresses in a stable order. Empty when enumeration fails.
    fn local_addresses(&self) -> Vec<IpAddr>;

    /// First non-loopback IPv4 address, or an empty string when there is none.
    fn pod_ip(&self) -> String {
        first_non_loopback_ipv4(&self.local_addresses())
            .map(|ip| ip.to_string())
            .unwrap_or_default()
    }
}

/// Enumerates the host's interfaces on every call. Interfaces are visited in
/// name order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAddressProvider;

impl LocalAddressProvider for SystemAddressProvider {
    fn local_addresses(&self) -> Vec<IpAddr> {
        let networks = Networks::new_with_refreshed_list();
        let mut interfaces: Vec<_> = networks.iter().collect();
        interfaces.sort_by(|(a, _), (b, _)| a.cmp(b));

        interfaces
            .into_iter()
            .flat_map(|(_, data)| data.ip_networks().iter().map(|network| network.addr))
            .collect()
    }
}

fn first_non_loopback_ipv4(addrs: &[IpAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .copied()
        .find(|addr| addr.is_ipv4() && !addr.is_loopback())
}
