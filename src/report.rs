use crate::echo_outcome::{EchoExchange, EchoOutcome};
use crate::session_stats::SessionStats;
use std::fmt;
use std::net::Ipv4Addr;

/// First line printed before any request goes out.
pub struct Banner<'a> {
    pub host: &'a str,
    pub target: Ipv4Addr,
    pub payload_size: usize,
}

impl fmt::Display for Banner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PING {} ({}) - {} data bytes",
            self.host, self.target, self.payload_size
        )
    }
}

impl fmt::Display for EchoExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seq = self.sequence_number;
        match &self.outcome {
            EchoOutcome::Success {
                reply_length,
                ip_addr,
                ttl,
                round_trip,
            } => {
                write!(f, "{reply_length} bytes from {ip_addr}: seq={seq}")?;
                if let Some(ttl) = ttl {
                    write!(f, " ttl={ttl}")?;
                }
                write!(f, " time={:.3} ms", round_trip.as_secs_f64() * 1000.0)
            }
            EchoOutcome::Timeout => write!(f, "icmp timeout seq={seq}"),
            EchoOutcome::SendFailure => write!(f, "packet send failure seq={seq}"),
            EchoOutcome::UnexpectedReply { icmp_type, ip_addr } => {
                write!(f, "unexpected icmp type {icmp_type} from {ip_addr}: ")?;
                write!(f, "seq={seq}")
            }
        }
    }
}

/// Statistics block printed once at the end of a session.
pub struct Summary<'a> {
    pub host: &'a str,
    pub stats: &'a SessionStats,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats;
        writeln!(f, "--- {} ping statistics ---", self.host)?;
        write!(
            f,
            "{} packets sent, {} packets received - ",
            stats.total_sent, stats.total_succeeded
        )?;
        match stats.packet_loss() {
            Some(loss) => writeln!(f, "{loss:.2}% packet loss")?,
            None => writeln!(f, "no packet loss data")?,
        }
        match stats.trip_statistics() {
            Ok(trip) => write!(
                f,
                "roundtrip min/max/mean/stddev: {:.3}/{:.3}/{:.3}/{:.3} ms",
                trip.min, trip.max, trip.mean, trip.stddev
            ),
            Err(_) => write!(f, "roundtrip min/max/mean/stddev: no data"),
        }
    }
}
