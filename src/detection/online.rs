//! Network reachability check.

use std::net::ToSocketAddrs;

/// Registry host probed by [`is_online`].
pub const REGISTRY_HOST: &str = "registry.yarnpkg.com";

/// Whether the package registry host resolves.
///
/// A DNS lookup is enough to tell yarn whether to fall back to its
/// offline mirror.
pub fn is_online() -> bool {
    host_resolves(REGISTRY_HOST)
}

/// Whether `host` resolves to at least one address.
pub fn host_resolves(host: &str) -> bool {
    (host, 443)
        .to_socket_addrs()
        .map(|mut addrs| addrs.next().is_some())
        .unwrap_or(false)
}
