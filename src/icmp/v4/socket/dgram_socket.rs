use super::{remaining_until, TSocket};
use crate::icmp::v4::Ttl;
use socket2::{Domain, Protocol, Type};
use std::io;
use std::net::IpAddr;
use std::time::Instant;

pub struct DgramSocket {
    socket: socket2::Socket,
}

impl DgramSocket {
    pub(crate) fn new() -> Result<Self, io::Error> {
        tracing::trace!("creating DgramSocket");
        let socket = socket2::Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::ICMPV4))?;
        Ok(DgramSocket { socket })
    }
}

impl TSocket for DgramSocket {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize> {
        self.socket.send_to(buf, addr)
    }

    // The kernel strips the IP header on ICMP datagram sockets, so the TTL is
    // not available here.
    fn recv_from(
        &self,
        buf: &mut [u8],
        deadline: Instant,
    ) -> io::Result<(usize, IpAddr, Option<Ttl>)> {
        self.socket.set_read_timeout(Some(remaining_until(deadline)?))?;

        // See RawSocket::recv_from for the cast.
        let (n_bytes, socket_addr) = socket2::Socket::recv_from(&self.socket, unsafe {
            &mut *(std::ptr::addr_of_mut!(*buf) as *mut [std::mem::MaybeUninit<u8>])
        })?;
        let ip = socket_addr
            .as_socket()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    "error in extracting IP address from SockAddr",
                )
            })?
            .ip();
        Ok((n_bytes, ip, None))
    }

    // Linux replaces the identifier with the socket's local port and only
    // delivers replies addressed to that port.
    fn assigns_identifier(&self) -> bool {
        true
    }
}
