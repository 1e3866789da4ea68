use pingo::{
    lookup_host_v4, Banner, ErrorKind, GenericError, PingError, PingSession, SessionConfig,
    Socket, SocketType, StopCondition,
};
use std::process::ExitCode;
use std::time::Duration;

#[derive(argh::FromArgs)]
/// pingo - send ICMP ECHO_REQUEST packets to a host until interrupted
struct Args {
    #[argh(option, short = 'c')]
    /// stop after <count> echo requests
    count: Option<u64>,

    #[argh(option, short = 'i', default = "1000")]
    /// pause between echo requests in milliseconds
    interval: u64,

    #[argh(option, short = 'W', default = "500")]
    /// time to wait for a reply in milliseconds
    timeout: u64,

    #[argh(option, short = 's', default = "56")]
    /// number of payload bytes (at most 256)
    size: usize,

    #[argh(switch)]
    /// use an unprivileged datagram ICMP socket instead of a raw socket
    dgram: bool,

    #[argh(option, default = "tracing::Level::WARN")]
    /// log level (error, warn, info, debug, trace)
    log_level: tracing::Level,

    #[argh(positional)]
    /// IPv4 address or host name
    host: String,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("pingo: setting default subscriber failed: {e}");
    }

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("pingo: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, GenericError> {
    let target = lookup_host_v4(&args.host)?;
    let socket_type = if args.dgram {
        SocketType::Dgram
    } else {
        SocketType::Raw
    };
    let socket = Socket::new(socket_type).map_err(|e| {
        let mut error = PingError::from(e);
        if error.kind == ErrorKind::PermissionDenied {
            error
                .message
                .push_str(" (raw ICMP sockets need root or CAP_NET_RAW, try --dgram)");
        }
        error
    })?;

    let stop_condition = StopCondition::new();
    stop_condition.stop_on_interrupt()?;

    let config = SessionConfig {
        payload_size: args.size,
        interval: Duration::from_millis(args.interval),
        timeout: Duration::from_millis(args.timeout),
        count: args.count,
        ..SessionConfig::default()
    };
    tracing::debug!("pinging {} with {:?}", target, config);
    let session = PingSession::new(socket, target, config, stop_condition)?;

    let banner = Banner {
        host: &args.host,
        target,
        payload_size: args.size,
    };
    println!("{banner}");
    let report = session.run(|exchange| println!("{exchange}"));

    match report.summary(&args.host) {
        Some(summary) => {
            println!();
            println!("{summary}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            let icmp_type = report.tainted_by.unwrap_or_default();
            eprintln!("pingo: unexpected ICMP type {icmp_type}, no statistics");
            Ok(ExitCode::FAILURE)
        }
    }
}
