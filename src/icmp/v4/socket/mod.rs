use crate::icmp::v4::Ttl;
use std::io;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use super::{DgramSocket, RawSocket};

pub(crate) mod dgram_socket;
pub(crate) mod raw_socket;

/// Transport for ICMPv4 echo packets.
///
/// `send_to` takes a complete ICMP message. `recv_from` blocks until an ICMP
/// message arrives or `deadline` passes; it writes the ICMP message (without
/// any IP header) into `buf` and returns its length, the source address and,
/// where the transport can see it, the TTL of the carrying datagram. A passed
/// deadline is reported as `WouldBlock` or `TimedOut`.
pub trait TSocket: Send + Sync {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize>;
    fn recv_from(
        &self,
        buf: &mut [u8],
        deadline: Instant,
    ) -> io::Result<(usize, IpAddr, Option<Ttl>)>;

    /// True when the kernel rewrites the echo identifier, so replies cannot be
    /// matched against the identifier we sent.
    fn assigns_identifier(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SocketType {
    /// `SOCK_DGRAM` ICMP socket, usable without privileges where the system
    /// allows it (`net.ipv4.ping_group_range` on Linux).
    Dgram,
    /// `SOCK_RAW` ICMP socket, needs root or `CAP_NET_RAW`.
    Raw,
}

pub enum Socket {
    Raw(RawSocket),
    Dgram(DgramSocket),
}

impl Socket {
    pub fn new(socket_type: SocketType) -> Result<Self, io::Error> {
        match socket_type {
            SocketType::Dgram => Ok(Socket::Dgram(DgramSocket::new()?)),
            SocketType::Raw => Ok(Socket::Raw(RawSocket::new()?)),
        }
    }
}

impl TSocket for Socket {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize> {
        match self {
            Socket::Dgram(socket) => socket.send_to(buf, addr),
            Socket::Raw(socket) => socket.send_to(buf, addr),
        }
    }

    fn recv_from(
        &self,
        buf: &mut [u8],
        deadline: Instant,
    ) -> io::Result<(usize, IpAddr, Option<Ttl>)> {
        match self {
            Socket::Dgram(socket) => socket.recv_from(buf, deadline),
            Socket::Raw(socket) => socket.recv_from(buf, deadline),
        }
    }

    fn assigns_identifier(&self) -> bool {
        match self {
            Socket::Dgram(socket) => socket.assigns_identifier(),
            Socket::Raw(socket) => socket.assigns_identifier(),
        }
    }
}

// Read timeouts of zero are rejected by the OS, so an expired deadline never
// reaches the socket.
pub(crate) fn remaining_until(deadline: Instant) -> io::Result<Duration> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return Err(io::Error::new(io::ErrorKind::TimedOut, "receive deadline exceeded"));
    }
    Ok(remaining)
}
