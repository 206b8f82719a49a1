use std::time::Duration;
use tracing::warn;

/// Turns a caller-supplied tick delta into a `Duration`.
///
/// Negative, NaN and infinite deltas become zero so the reducer always has a
/// next state.
pub fn sanitize_delta(delta_seconds: f64) -> Duration {
    if !delta_seconds.is_finite() || delta_seconds < 0.0 {
        warn!("Clamping out-of-order tick delta {} to zero", delta_seconds);
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(delta_seconds).unwrap_or(Duration::ZERO)
}

/// Derives tick deltas from frame timestamps.
#[derive(Debug, Default, Clone)]
pub struct TickClock {
    last_ms: Option<u64>,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous timestamp. The first call and any backwards
    /// jump yield zero; a backwards jump does not move the reference point.
    pub fn advance(&mut self, timestamp_ms: u64) -> f64 {
        let delta_ms = match self.last_ms {
            None => 0,
            Some(last) if timestamp_ms < last => {
                warn!(
                    "Timestamp went backwards ({} < {}), treating tick as zero-length",
                    timestamp_ms, last
                );
                return 0.0;
            }
            Some(last) => timestamp_ms - last,
        };
        self.last_ms = Some(timestamp_ms);
        delta_ms as f64 / 1000.0
    }
}
