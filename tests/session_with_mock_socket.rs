use pingo::{
    parse_echo_reply, EchoOutcome, ErrorKind, PingSession, SessionConfig, StopCondition, TSocket,
    Ttl, ICMP_ECHO_REPLY,
};
use std::collections::VecDeque;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use more_asserts as ma;

/// Echoes every request back byte for byte with the type set to Echo Reply.
#[derive(Clone, Default)]
struct EchoSocket {
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    pending: Arc<Mutex<VecDeque<Vec<u8>>>>,
}

impl TSocket for EchoSocket {
    fn send_to(&self, buf: &[u8], _addr: &socket2::SockAddr) -> io::Result<usize> {
        self.sent.lock().unwrap().push(buf.to_vec());
        let mut reply = buf.to_vec();
        reply[0] = ICMP_ECHO_REPLY;
        self.pending.lock().unwrap().push_back(reply);
        Ok(buf.len())
    }

    fn recv_from(
        &self,
        buf: &mut [u8],
        _deadline: Instant,
    ) -> io::Result<(usize, IpAddr, Option<Ttl>)> {
        match self.pending.lock().unwrap().pop_front() {
            Some(reply) => {
                buf[..reply.len()].copy_from_slice(&reply);
                Ok((reply.len(), IpAddr::V4(Ipv4Addr::LOCALHOST), Some(Ttl(64))))
            }
            None => Err(io::Error::new(io::ErrorKind::WouldBlock, "nothing to echo")),
        }
    }
}

/// Accepts every request and never answers; waits out the deadline like a
/// real socket would.
#[derive(Clone, Default)]
struct SilentSocket {
    sent: Arc<Mutex<usize>>,
}

impl TSocket for SilentSocket {
    fn send_to(&self, buf: &[u8], _addr: &socket2::SockAddr) -> io::Result<usize> {
        *self.sent.lock().unwrap() += 1;
        Ok(buf.len())
    }

    fn recv_from(
        &self,
        _buf: &mut [u8],
        deadline: Instant,
    ) -> io::Result<(usize, IpAddr, Option<Ttl>)> {
        std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
        Err(io::Error::new(io::ErrorKind::TimedOut, "no reply"))
    }
}

fn config(count: u64) -> SessionConfig {
    SessionConfig {
        interval: Duration::ZERO,
        timeout: Duration::from_millis(10),
        count: Some(count),
        ..SessionConfig::default()
    }
}

fn session<S: TSocket>(socket: S, config: SessionConfig) -> PingSession<S> {
    PingSession::new(socket, Ipv4Addr::LOCALHOST, config, StopCondition::new()).unwrap()
}

#[test]
fn echoing_transport_yields_no_loss() {
    let socket = EchoSocket::default();
    let mut sequence_numbers = vec![];

    let report = session(socket.clone(), config(10)).run(|exchange| {
        match exchange.outcome {
            EchoOutcome::Success { reply_length, .. } => assert_eq!(64, reply_length),
            ref outcome => panic!("unexpected outcome {outcome:?}"),
        }
        sequence_numbers.push(exchange.sequence_number);
    });

    assert_eq!((1..=10).collect::<Vec<u16>>(), sequence_numbers);
    assert!(!report.is_tainted());
    assert_eq!(10, report.stats.total_sent);
    assert_eq!(report.stats.total_sent, report.stats.total_succeeded);
    assert_eq!(0, report.stats.total_failed);
    assert_eq!(10, report.stats.round_trip_samples.len());
    for sample in &report.stats.round_trip_samples {
        ma::assert_ge!(*sample, 0.0);
    }
    assert_eq!(Some(0.0), report.stats.packet_loss());

    let trip = report.stats.trip_statistics().unwrap();
    ma::assert_le!(trip.min, trip.mean);
    ma::assert_le!(trip.mean, trip.max);

    let sent = socket.sent.lock().unwrap();
    for (i, package) in sent.iter().enumerate() {
        let request = parse_echo_reply(package).unwrap();
        let expected = u16::try_from(i + 1).unwrap();
        assert_eq!(expected, u16::from(request.sequence_number));
    }
}

#[test]
fn silent_transport_yields_full_loss() {
    let socket = SilentSocket::default();
    let mut outcomes = vec![];

    let session = session(socket.clone(), config(3));
    let report = session.run(|exchange| outcomes.push(exchange.outcome.clone()));

    assert_eq!(vec![EchoOutcome::Timeout; 3], outcomes);
    assert_eq!(3, *socket.sent.lock().unwrap());
    assert_eq!(0, report.stats.total_succeeded);
    assert_eq!(report.stats.total_sent, report.stats.total_failed);
    assert_eq!(Some(100.0), report.stats.packet_loss());
    let error = report.stats.trip_statistics().unwrap_err();
    assert_eq!(ErrorKind::InsufficientData, error.kind);

    let summary = report.summary("localhost").unwrap().to_string();
    assert!(summary.contains("100.00% packet loss"));
    assert!(summary.contains("no data"));
}

#[test]
fn silent_transport_waits_for_the_deadline() {
    let config = SessionConfig {
        timeout: Duration::from_millis(50),
        ..config(1)
    };
    let mut session = session(SilentSocket::default(), config);

    let start = Instant::now();
    assert_eq!(EchoOutcome::Timeout, session.step().outcome);
    ma::assert_ge!(start.elapsed(), Duration::from_millis(50));
}

#[test]
fn interrupt_from_another_thread_ends_an_endless_session() {
    let stop_condition = StopCondition::new();
    let interrupter = stop_condition.clone();
    let config = SessionConfig {
        interval: Duration::from_millis(5),
        count: None,
        ..config(0)
    };
    let socket = EchoSocket::default();
    let session = PingSession::new(socket, Ipv4Addr::LOCALHOST, config, stop_condition).unwrap();

    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        interrupter.set_should_stop();
    });
    let report = session.run(|_| {});
    handle.join().unwrap();

    ma::assert_gt!(report.stats.total_sent, 0);
    assert_eq!(report.stats.total_sent, report.stats.total_succeeded);
}
