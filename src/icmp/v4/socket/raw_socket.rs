use super::{remaining_until, TSocket};
use crate::icmp::v4::Ttl;
use pnet_packet::{ipv4::Ipv4Packet, Packet};
use socket2::{Domain, Protocol, Type};
use std::io;
use std::net::IpAddr;
use std::time::Instant;

const RECV_BUFFER_SIZE: usize = 1500;

pub struct RawSocket {
    socket: socket2::Socket,
}

impl RawSocket {
    pub(crate) fn new() -> Result<Self, io::Error> {
        tracing::trace!("creating RawSocket");
        let socket = socket2::Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
        Ok(RawSocket { socket })
    }
}

impl TSocket for RawSocket {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize> {
        self.socket.send_to(buf, addr)
    }

    fn recv_from(
        &self,
        buf: &mut [u8],
        deadline: Instant,
    ) -> io::Result<(usize, IpAddr, Option<Ttl>)> {
        self.socket.set_read_timeout(Some(remaining_until(deadline)?))?;

        let mut recv_buf = [0u8; RECV_BUFFER_SIZE];

        // Socket2 gives a safety guaranty which allows us to do an unsafe cast from `&mut [u8]`
        // to `&mut [std::mem::MaybeUninit<u8>]`.
        // https://docs.rs/socket2/0.4.7/socket2/struct.Socket.html#method.recv
        //
        // On a RAW socket we get an IP packet.
        let (n_bytes, socket_addr) = socket2::Socket::recv_from(&self.socket, unsafe {
            &mut *(std::ptr::addr_of_mut!(recv_buf) as *mut [u8]
                as *mut [std::mem::MaybeUninit<u8>])
        })?;
        let ipv4_packet = Ipv4Packet::new(&recv_buf[..n_bytes])
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "truncated IPv4 header"))?;
        // Return only the ICMP content
        let ip_payload = ipv4_packet.payload();
        if buf.len() < ip_payload.len() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "receive buffer too small"));
        }
        buf[..ip_payload.len()].copy_from_slice(ip_payload);

        let ip = socket_addr
            .as_socket_ipv4()
            .map_or_else(|| ipv4_packet.get_source(), |addr| *addr.ip());
        let ttl = Some(Ttl(ipv4_packet.get_ttl()));
        Ok((ip_payload.len(), IpAddr::V4(ip), ttl))
    }
}
