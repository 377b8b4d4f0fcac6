use crate::error::AddressError;
use std::net::IpAddr;

/// Resolves the routable local address this node advertises to peers.
///
/// Everything cluster-facing (coordination client, membership calls) is
/// unusable without an address, so a resolution failure is terminal for
/// bootstrap. Implementations return the error; they never exit the process.
pub trait AddressResolver: Send + Sync {
    /// # Errors
    /// Returns [`AddressError`] if no routable address can be determined.
    fn resolve(&self) -> Result<IpAddr, AddressError>;
}

/// Detects the IP of the interface used for the default route.
///
/// This is the address of the network interface that would carry outbound
/// traffic, not the public external IP.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalIpResolver;

impl AddressResolver for LocalIpResolver {
    fn resolve(&self) -> Result<IpAddr, AddressError> {
        match local_ip_address::local_ip() {
            Ok(ip) => {
                tracing::debug!(ip = %ip, "Detected local IP address");
                ensure_routable(ip)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to detect local IP address");
                Err(AddressError::DetectFailed(e.to_string()))
            }
        }
    }
}

/// Uses an operator-configured advertise address instead of detection.
#[derive(Debug, Clone, Copy)]
pub struct StaticAddressResolver {
    ip: IpAddr,
}

impl StaticAddressResolver {
    #[must_use]
    pub fn new(ip: IpAddr) -> Self {
        Self { ip }
    }
}

impl AddressResolver for StaticAddressResolver {
    fn resolve(&self) -> Result<IpAddr, AddressError> {
        ensure_routable(self.ip)
    }
}

// 0.0.0.0 / :: would make peers dial themselves
fn ensure_routable(ip: IpAddr) -> Result<IpAddr, AddressError> {
    if ip.is_unspecified() || ip.is_multicast() {
        return Err(AddressError::Unroutable(ip));
    }
    Ok(ip)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_static_resolver_returns_configured_ip() {
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7));
        assert_eq!(StaticAddressResolver::new(ip).resolve().unwrap(), ip);
    }

    #[test]
    fn test_static_resolver_rejects_unspecified() {
        let v4 = StaticAddressResolver::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let v6 = StaticAddressResolver::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED));
        assert!(matches!(v4.resolve(), Err(AddressError::Unroutable(_))));
        assert!(matches!(v6.resolve(), Err(AddressError::Unroutable(_))));
    }

    #[test]
    fn test_local_resolver_never_yields_unspecified() {
        // Detection may legitimately fail in sandboxes without a default route
        if let Ok(ip) = LocalIpResolver.resolve() {
            assert!(!ip.is_unspecified());
        }
    }
}
