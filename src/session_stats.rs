use crate::echo_outcome::EchoOutcome;
use crate::ping_error::{ErrorKind, PingError};

/// Counters and round-trip samples of one ping session.
///
/// `total_sent` counts requests that were handed to the transport in full.
/// Every sent request ends up in exactly one of `total_succeeded` and
/// `total_failed`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionStats {
    pub total_sent: u64,
    pub total_succeeded: u64,
    pub total_failed: u64,
    /// Round-trip times in milliseconds, in arrival order.
    pub round_trip_samples: Vec<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TripStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stddev: f64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, outcome: &EchoOutcome) {
        match outcome {
            EchoOutcome::SendFailure => {}
            EchoOutcome::Success { round_trip, .. } => {
                self.total_sent += 1;
                self.total_succeeded += 1;
                self.round_trip_samples.push(round_trip.as_secs_f64() * 1000.0);
            }
            EchoOutcome::Timeout | EchoOutcome::UnexpectedReply { .. } => {
                self.total_sent += 1;
                self.total_failed += 1;
            }
        }
    }

    pub fn trip_statistics(&self) -> Result<TripStatistics, PingError> {
        trip_statistics(&self.round_trip_samples)
    }

    pub fn packet_loss(&self) -> Option<f64> {
        packet_loss(self.total_sent, self.total_failed)
    }
}

/// Minimum, maximum, mean and population standard deviation of `samples`.
#[allow(clippy::cast_precision_loss)]
pub fn trip_statistics(samples: &[f64]) -> Result<TripStatistics, PingError> {
    if samples.is_empty() {
        return Err(PingError::new(ErrorKind::InsufficientData, "no round-trip samples"));
    }

    let count = samples.len() as f64;
    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &sample| {
            (min.min(sample), max.max(sample))
        });
    let mean = samples.iter().sum::<f64>() / count;
    let variance = samples
        .iter()
        .map(|sample| (sample - mean).powi(2))
        .sum::<f64>()
        / count;

    Ok(TripStatistics {
        min,
        max,
        mean,
        stddev: variance.sqrt(),
    })
}

/// Percentage of sent requests that failed, `None` when nothing was sent.
#[allow(clippy::cast_precision_loss)]
pub fn packet_loss(total_sent: u64, total_failed: u64) -> Option<f64> {
    if total_sent == 0 {
        return None;
    }
    Some(total_failed as f64 / total_sent as f64 * 100.0)
}
