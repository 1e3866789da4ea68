use crate::echo_outcome::{EchoExchange, EchoOutcome};
use crate::icmp::v4::{
    build_echo_request, is_error_message, parse_echo_reply, parse_quoted_echo_request,
    verify_checksum, EchoReply, SequenceNumber, TSocket, ICMP_ECHO_REPLY, ICMP_ECHO_REQUEST,
    MAX_PAYLOAD_SIZE,
};
use crate::ping_error::{ErrorKind, PingError};
use crate::report::Summary;
use crate::session_stats::SessionStats;
use crate::stop_condition::StopCondition;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

const FILLER: &[u8] = b"Hello, world!";
const RECV_BUFFER_SIZE: usize = 1500;

/// How a received ICMP message is tied to the outstanding request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReplyMatching {
    /// Identifier (unless the transport assigns it) and sequence number must
    /// match the outstanding request. Echo replies carry them in their own
    /// header, error messages in the request they quote. Everything else is
    /// skipped.
    Strict,
    /// Any echo reply is accepted and any other message except an echo
    /// request is unexpected.
    TypeOnly,
}

#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub payload_size: usize,
    /// Pause between the end of one exchange and the next request.
    pub interval: Duration,
    /// Receive deadline, measured from the send timestamp.
    pub timeout: Duration,
    /// Number of requests to attempt; `None` runs until stopped.
    pub count: Option<u64>,
    pub identifier: u16,
    pub reply_matching: ReplyMatching,
    /// Skip replies whose ICMP checksum does not verify.
    pub verify_reply_checksum: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            payload_size: 56,
            interval: Duration::from_secs(1),
            timeout: Duration::from_millis(500),
            count: None,
            identifier: process_identifier(),
            reply_matching: ReplyMatching::Strict,
            verify_reply_checksum: false,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn process_identifier() -> u16 {
    (std::process::id() & 0xFFFF) as u16
}

/// Final state of a session, handed out once the loop has stopped.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    pub stats: SessionStats,
    /// ICMP type of the first unexpected message, if any was received.
    pub tainted_by: Option<u8>,
}

impl SessionReport {
    pub fn is_tainted(&self) -> bool {
        self.tainted_by.is_some()
    }

    /// Closing statistics for `host`. A tainted session has none.
    pub fn summary<'a>(&'a self, host: &'a str) -> Option<Summary<'a>> {
        if self.is_tainted() {
            return None;
        }
        Some(Summary {
            host,
            stats: &self.stats,
        })
    }
}

/// Sends one echo request at a time to a single IPv4 target and waits for its
/// reply before the next request goes out.
pub struct PingSession<S> {
    socket: S,
    target: socket2::SockAddr,
    config: SessionConfig,
    payload: Vec<u8>,
    sequence_number: SequenceNumber,
    stats: SessionStats,
    tainted_by: Option<u8>,
    stop_condition: StopCondition,
}

impl<S> PingSession<S>
where
    S: TSocket,
{
    pub fn new(
        socket: S,
        target: Ipv4Addr,
        config: SessionConfig,
        stop_condition: StopCondition,
    ) -> Result<Self, PingError> {
        if config.payload_size > MAX_PAYLOAD_SIZE {
            return Err(PingError::new(
                ErrorKind::PayloadTooLarge,
                format!(
                    "payload of {} bytes exceeds the maximum of {MAX_PAYLOAD_SIZE} bytes",
                    config.payload_size
                ),
            ));
        }
        let payload = FILLER
            .iter()
            .cycle()
            .take(config.payload_size)
            .copied()
            .collect();
        Ok(PingSession {
            socket,
            target: SocketAddr::new(IpAddr::V4(target), 0).into(),
            config,
            payload,
            sequence_number: SequenceNumber::default(),
            stats: SessionStats::new(),
            tainted_by: None,
            stop_condition,
        })
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Runs exchanges until the stop condition is set or `count` exchanges
    /// are done. `on_exchange` sees every exchange as soon as it completes.
    pub fn run<F>(mut self, mut on_exchange: F) -> SessionReport
    where
        F: FnMut(&EchoExchange),
    {
        let mut iterations: u64 = 0;
        while !self.stop_condition.should_stop() && self.has_exchanges_left(iterations) {
            let exchange = self.step();
            iterations += 1;
            on_exchange(&exchange);

            if !self.has_exchanges_left(iterations) {
                break;
            }
            if self.stop_condition.wait_timeout(self.config.interval) {
                break;
            }
        }
        tracing::debug!("session stopped after {} exchanges", iterations);
        SessionReport {
            stats: self.stats,
            tainted_by: self.tainted_by,
        }
    }

    fn has_exchanges_left(&self, iterations: u64) -> bool {
        match self.config.count {
            Some(count) => iterations < count,
            None => true,
        }
    }

    /// One full exchange: next sequence number, send, wait for the reply.
    pub fn step(&mut self) -> EchoExchange {
        self.sequence_number = self.sequence_number.next();
        let sequence_number = self.sequence_number;

        let outcome = self.exchange(sequence_number);
        self.stats.record(&outcome);
        if let EchoOutcome::UnexpectedReply { icmp_type, .. } = outcome {
            self.tainted_by.get_or_insert(icmp_type);
        }

        EchoExchange {
            sequence_number: sequence_number.into(),
            outcome,
        }
    }

    fn exchange(&self, sequence_number: SequenceNumber) -> EchoOutcome {
        let identifier = self.config.identifier;
        let package = match build_echo_request(identifier, sequence_number, &self.payload) {
            Ok(package) => package,
            Err(e) => {
                tracing::error!("could not build echo request: {}", e);
                return EchoOutcome::SendFailure;
            }
        };

        let send_time = Instant::now();
        match self.socket.send_to(&package, &self.target) {
            Ok(n) if n == package.len() => tracing::trace!("echo request {} sent", sequence_number),
            Ok(n) => {
                tracing::warn!(
                    "short write for echo request {}: {} of {} bytes",
                    sequence_number,
                    n,
                    package.len()
                );
                return EchoOutcome::SendFailure;
            }
            Err(e) => {
                tracing::warn!("error sending echo request {}: {}", sequence_number, e);
                return EchoOutcome::SendFailure;
            }
        }

        self.await_reply(sequence_number, send_time, send_time + self.config.timeout)
    }

    fn await_reply(
        &self,
        sequence_number: SequenceNumber,
        send_time: Instant,
        deadline: Instant,
    ) -> EchoOutcome {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        loop {
            let (n_bytes, ip_addr, ttl) = match self.socket.recv_from(&mut buf, deadline) {
                Ok(received) => received,
                Err(e) if is_timeout(&e) => return EchoOutcome::Timeout,
                Err(e) => {
                    tracing::warn!("error receiving echo reply {}: {}", sequence_number, e);
                    return EchoOutcome::Timeout;
                }
            };
            let receive_time = Instant::now();

            let package = &buf[..n_bytes];
            let reply = match parse_echo_reply(package) {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::debug!("skipping message from {}: {}", ip_addr, e);
                    continue;
                }
            };
            if self.config.verify_reply_checksum && !verify_checksum(package) {
                tracing::debug!(
                    "skipping message from {} with bad checksum {:#06x}",
                    ip_addr,
                    reply.checksum
                );
                continue;
            }

            match reply.icmp_type {
                ICMP_ECHO_REPLY if self.is_reply_to(&reply, sequence_number) => {
                    tracing::trace!("echo reply {} received", sequence_number);
                    return EchoOutcome::Success {
                        reply_length: n_bytes,
                        ip_addr,
                        ttl,
                        round_trip: receive_time - send_time,
                    };
                }
                ICMP_ECHO_REPLY => {
                    tracing::debug!(
                        "skipping echo reply id={} seq={} while waiting for seq={}",
                        reply.identifier,
                        reply.sequence_number,
                        sequence_number
                    );
                }
                // Our own request looped back on a raw socket, or someone pinging us.
                ICMP_ECHO_REQUEST => tracing::trace!("skipping echo request from {}", ip_addr),
                icmp_type if self.is_about(&reply, sequence_number) => {
                    tracing::warn!(
                        "unexpected ICMP type {} from {} (code {})",
                        icmp_type,
                        ip_addr,
                        reply.icmp_code
                    );
                    return EchoOutcome::UnexpectedReply { icmp_type, ip_addr };
                }
                icmp_type => {
                    tracing::debug!("skipping ICMP type {} from {}", icmp_type, ip_addr);
                }
            }
        }
    }

    fn is_reply_to(&self, reply: &EchoReply<'_>, sequence_number: SequenceNumber) -> bool {
        match self.config.reply_matching {
            ReplyMatching::TypeOnly => true,
            ReplyMatching::Strict => self.carries_request(reply, sequence_number),
        }
    }

    fn is_about(&self, message: &EchoReply<'_>, sequence_number: SequenceNumber) -> bool {
        match self.config.reply_matching {
            ReplyMatching::TypeOnly => true,
            ReplyMatching::Strict => {
                is_error_message(message.icmp_type)
                    && parse_quoted_echo_request(message.payload)
                        .is_some_and(|request| self.carries_request(&request, sequence_number))
            }
        }
    }

    fn carries_request(&self, header: &EchoReply<'_>, sequence_number: SequenceNumber) -> bool {
        header.sequence_number == sequence_number
            && (self.socket.assigns_identifier() || header.identifier == self.config.identifier)
    }
}

fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
