//! Retry policies for transport failures
//!
//! Only transport failures retry: the request never produced an envelope,
//! so repeating it is the caller's only option. A non-`"ok"` envelope is a
//! server verdict and is never retried.

use std::time::Duration;

/// Decides whether and when to retry a failed roundtrip
///
/// Stateless: the attempt counter is passed in, so one policy instance can
/// serve every call a [`Caller`](crate::Caller) makes concurrently.
pub trait RetryPolicy: Send + Sync {
    /// Delay before retrying after failed attempt `attempt` (0-indexed).
    /// `None` gives up and surfaces the transport error.
    fn next_delay(&self, attempt: u32) -> Option<Duration>;
}

/// Never retry; the first transport error is final.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn next_delay(&self, _attempt: u32) -> Option<Duration> {
        None
    }
}

/// Retry a fixed number of times with a constant delay.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    attempts: u32,
    delay: Duration,
}

impl FixedDelay {
    /// Retry up to `attempts` times, waiting `delay` between tries.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

impl Default for FixedDelay {
    /// Ten immediate retries.
    fn default() -> Self {
        Self::new(10, Duration::ZERO)
    }
}

impl RetryPolicy for FixedDelay {
    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.attempts).then_some(self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_retry_gives_up_immediately() {
        assert_eq!(NoRetry.next_delay(0), None);
    }

    #[test]
    fn fixed_delay_bounds_the_attempts() {
        let policy = FixedDelay::new(3, Duration::from_millis(5));
        assert_eq!(policy.next_delay(0), Some(Duration::from_millis(5)));
        assert_eq!(policy.next_delay(2), Some(Duration::from_millis(5)));
        assert_eq!(policy.next_delay(3), None);
    }

    #[test]
    fn default_matches_ten_immediate_retries() {
        let policy = FixedDelay::default();
        assert_eq!(policy.next_delay(9), Some(Duration::ZERO));
        assert_eq!(policy.next_delay(10), None);
    }
}
