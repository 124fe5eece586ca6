//! Bounded polling with increasing intervals
//!
//! Used wherever a write becomes visible to a later read only after some
//! delay (the issue search index is the main case). An attempt is retried
//! until it satisfies the check or the deadline passes; the deadline is
//! never silently converted into success.

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// How long and how often to retry
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Overall deadline measured from the first attempt
    pub timeout: Duration,

    /// Sleep before each retry, consumed in order; the last one repeats
    pub intervals: Vec<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            intervals: vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(3),
            ],
        }
    }
}

impl PollPolicy {
    pub fn new(timeout: Duration, intervals: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            timeout,
            intervals: intervals.into_iter().collect(),
        }
    }

    /// Interval to sleep after the given (zero-based) failed attempt.
    pub fn interval(&self, attempt: usize) -> Duration {
        self.intervals
            .get(attempt)
            .or_else(|| self.intervals.last())
            .copied()
            .unwrap_or(Duration::from_millis(100))
    }
}

/// Run `op` until `check` accepts its output or the policy deadline passes.
///
/// `check` returns `Err(reason)` to request another attempt. Errors from `op`
/// are retried the same way. An attempt still running at the deadline is
/// abandoned. On timeout the last reason is reported.
pub async fn poll_until<T, E, F, Fut, C>(
    policy: &PollPolicy,
    what: &str,
    mut op: F,
    mut check: C,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Display,
    C: FnMut(&T) -> std::result::Result<(), String>,
{
    let start = Instant::now();
    let mut attempt = 0usize;

    loop {
        let budget = policy.timeout.saturating_sub(start.elapsed());
        let last_failure = match timeout(budget, op()).await {
            Ok(Ok(value)) => match check(&value) {
                Ok(()) => {
                    debug!("{} satisfied after {} attempt(s)", what, attempt + 1);
                    return Ok(value);
                }
                Err(reason) => reason,
            },
            Ok(Err(e)) => e.to_string(),
            Err(_) => "attempt timed out".to_string(),
        };

        let elapsed = start.elapsed();
        let remaining = policy.timeout.saturating_sub(elapsed);
        if remaining.is_zero() {
            warn!("Gave up on {} after {} attempt(s)", what, attempt + 1);
            return Err(Error::Timeout {
                what: what.to_string(),
                elapsed,
                last_failure,
            });
        }

        debug!("{} not yet satisfied (attempt {}): {}", what, attempt + 1, last_failure);
        sleep(policy.interval(attempt).min(remaining)).await;
        attempt += 1;
    }
}
