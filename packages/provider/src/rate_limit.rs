//! Per-provider request pacing.
//!
//! External providers enforce minimum inter-request intervals (2-3 s).
//! [`RequestPacer`] is a leaky bucket of depth 1: it remembers the last
//! send instant and sleeps out the remainder of the interval before the
//! next request. Making the wait policy an explicit abstraction keeps it
//! testable under paused tokio time instead of ad-hoc sleeps at call
//! sites.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum interval between consecutive requests.
///
/// Shared across sequential calls for one provider; the internal mutex
/// also serializes concurrent callers so the interval holds even if the
/// pacer is shared across tasks.
pub struct RequestPacer {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    /// Creates a pacer enforcing `min_interval` between requests.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Creates a pacer from a millisecond interval (the TOML config unit).
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// The enforced minimum interval.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until the minimum interval since the previous request has
    /// elapsed, then records this request's send instant.
    ///
    /// The first call never waits.
    pub async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}
