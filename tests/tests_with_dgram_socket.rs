use pingo::{
    lookup_host_v4, EchoOutcome, PingSession, SessionConfig, Socket, SocketType, StopCondition,
};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Once;
use std::time::Duration;

use more_asserts as ma;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

static SETUP: Once = Once::new();

fn setup() {
    SETUP.call_once(|| {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::ERROR)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");
    });
}

/*
* Note: Datagram ICMP sockets need the group of the process in
* net.ipv4.ping_group_range.
*/
#[test]
#[ignore = "needs net.ipv4.ping_group_range to include the test user"]
fn test_ping_to_localhost_with_dgram_socket() {
    setup();

    let localhost = Ipv4Addr::new(127, 0, 0, 1);
    let socket = Socket::new(SocketType::Dgram).unwrap();
    let config = SessionConfig {
        interval: Duration::ZERO,
        count: Some(1),
        ..SessionConfig::default()
    };

    let mut session = PingSession::new(socket, localhost, config, StopCondition::new()).unwrap();
    let exchange = session.step();

    match exchange.outcome {
        EchoOutcome::Success {
            ip_addr,
            round_trip,
            ttl,
            ..
        } => {
            assert_eq!(IpAddr::V4(localhost), ip_addr);
            assert!(ttl.is_none());
            ma::assert_gt!(round_trip, Duration::from_secs(0));
        }
        outcome => panic!("ping session did not return expected data: {outcome:?}"),
    }
}

#[test]
#[ignore = "needs network access and net.ipv4.ping_group_range"]
fn test_ping_to_host_name_on_network_with_dgram_socket() {
    setup();

    let target = lookup_host_v4("example.com").unwrap();
    let socket = Socket::new(SocketType::Dgram).unwrap();
    let config = SessionConfig {
        interval: Duration::from_millis(200),
        count: Some(3),
        ..SessionConfig::default()
    };

    let session = PingSession::new(socket, target, config, StopCondition::new()).unwrap();
    let report = session.run(|_| {});

    assert_eq!(3, report.stats.total_sent);
    ma::assert_gt!(report.stats.total_succeeded, 0);
}
