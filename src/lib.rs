#![warn(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

//! ICMP echo ("ping") client.
//!
//! [`PingSession`] sends one Echo Request at a time over a [`TSocket`],
//! waits a bounded time for the matching Echo Reply and folds every outcome
//! into [`SessionStats`]. A [`StopCondition`] ends the session from another
//! thread, typically a Ctrl-C handler.

pub use echo_outcome::{EchoExchange, EchoOutcome};
pub use icmp::v4::{
    build_echo_request, compute_checksum, parse_echo_reply, verify_checksum, DgramSocket,
    EchoReply, RawSocket, SequenceNumber, Socket, SocketType, TSocket, Ttl, ICMP_ECHO_REPLY,
    ICMP_ECHO_REQUEST, ICMP_HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
pub use ping_error::{ErrorKind, GenericError, PingError, PingResult};
pub use ping_session::{PingSession, ReplyMatching, SessionConfig, SessionReport};
pub use report::{Banner, Summary};
pub use session_stats::{packet_loss, trip_statistics, SessionStats, TripStatistics};
pub use stop_condition::StopCondition;
pub use utils::lookup_host_v4;

mod echo_outcome;
mod icmp;
mod ping_error;
mod ping_session;
mod report;
mod session_stats;
mod stop_condition;
mod utils;
