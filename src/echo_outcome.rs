use crate::icmp::v4::Ttl;
use std::net::IpAddr;
use std::time::Duration;

/// Result of one request/reply exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EchoOutcome {
    Success {
        /// Length of the ICMP reply in bytes.
        reply_length: usize,
        ip_addr: IpAddr,
        ttl: Option<Ttl>,
        round_trip: Duration,
    },
    /// No matching reply before the deadline, or the receive failed.
    Timeout,
    /// The request could not be written in full. Not counted as sent.
    SendFailure,
    /// An ICMP message that is neither an echo request nor an echo reply.
    UnexpectedReply { icmp_type: u8, ip_addr: IpAddr },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EchoExchange {
    pub sequence_number: u16,
    pub outcome: EchoOutcome,
}
