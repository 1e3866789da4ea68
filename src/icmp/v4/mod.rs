mod icmpv4;
pub use icmpv4::{
    build_echo_request, compute_checksum, is_error_message, parse_echo_reply,
    parse_quoted_echo_request, verify_checksum, EchoReply, ICMP_ECHO_REPLY, ICMP_ECHO_REQUEST,
    ICMP_HEADER_SIZE, MAX_PAYLOAD_SIZE,
};

mod sequence_number;
pub use sequence_number::SequenceNumber;

mod socket;
pub use socket::dgram_socket::DgramSocket;
pub use socket::raw_socket::RawSocket;
pub use socket::{Socket, SocketType, TSocket};
#[cfg(test)]
pub(crate) use socket::tests;

mod ttl;
pub use ttl::Ttl;
