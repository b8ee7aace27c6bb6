use std::time::Duration;

/// Delay between consecutive attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// No waiting between attempts
    None,
    /// Same delay after every failed attempt
    Fixed(Duration),
}

impl Backoff {
    pub fn delay(&self) -> Duration {
        match self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(delay) => *delay,
        }
    }
}

/// Bounded retry policy shared by the search and apply phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Fixed(delay),
        }
    }

    /// Policy without delays, for tests and dry runs
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::None,
        }
    }

    /// Attempt numbers, starting at 1
    pub fn attempts(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.max_attempts.max(1)
    }

    pub fn is_last(&self, attempt: u32) -> bool {
        attempt >= self.max_attempts
    }

    /// Wait out the backoff after a failed `attempt`.
    ///
    /// Returns `false` without waiting when no attempts remain.
    pub async fn wait_before_retry(&self, attempt: u32) -> bool {
        if self.is_last(attempt) {
            return false;
        }

        let delay = self.backoff.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        true
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(2))
    }
}
