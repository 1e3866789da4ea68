use crate::ping_error::{ErrorKind, PingError};
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};

/// Resolves a dotted IPv4 address or a hostname to the first IPv4 address.
pub fn lookup_host_v4(hostname: &str) -> Result<Ipv4Addr, PingError> {
    if let Ok(ip) = hostname.parse::<Ipv4Addr>() {
        return Ok(ip);
    }
    let mut addrs = (hostname, 0).to_socket_addrs().map_err(|e| {
        let message = format!("could not resolve hostname {hostname}: {e}");
        PingError::new(ErrorKind::Resolve, message)
    })?;
    addrs
        .find_map(|addr| match addr {
            SocketAddr::V4(addr) => Some(*addr.ip()),
            SocketAddr::V6(_) => None,
        })
        .ok_or_else(|| {
            let message = format!("could not resolve hostname {hostname} to IPv4");
            PingError::new(ErrorKind::Resolve, message)
        })
}
