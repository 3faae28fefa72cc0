use std::time::Duration;

/// Configures attempt count, delays and timeouts of a readiness wait.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PollOptions {
    /// Maximum number of health checks. `0` is treated as `1`.
    pub max_attempts: usize,
    /// Fixed delay between attempts in milliseconds. `0` polls in a tight loop.
    pub retry_delay_ms: u64,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Outer bound for the whole setup in milliseconds, see [`crate::before_all`].
    pub setup_timeout_ms: u64,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            retry_delay_ms: 3_000,
            request_timeout_ms: 2_000,
            setup_timeout_ms: 60_000,
        }
    }
}

impl PollOptions {
    /// Number of attempts actually made.
    pub fn effective_attempts(&self) -> usize {
        self.max_attempts.max(1)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn setup_timeout(&self) -> Duration {
        Duration::from_millis(self.setup_timeout_ms)
    }

    /// Longest a failing wait can take: every request timing out plus the
    /// delays between attempts. There is no delay after the last attempt.
    pub fn worst_case(&self) -> Duration {
        let attempts = self.effective_attempts() as u64;
        let millis = attempts
            .saturating_mul(self.request_timeout_ms)
            .saturating_add((attempts - 1).saturating_mul(self.retry_delay_ms));
        Duration::from_millis(millis)
    }

    /// Whether the poller always gives up before the setup timeout fires.
    pub fn fits_setup_timeout(&self) -> bool {
        self.worst_case() <= self.setup_timeout()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::PollOptions;

    #[test]
    fn defaults_fit_inside_setup_timeout() {
        let opts = PollOptions::default();
        assert_eq!(opts.worst_case(), Duration::from_secs(47));
        assert!(opts.fits_setup_timeout());
    }

    #[test]
    fn zero_attempts_is_treated_as_one() {
        let opts = PollOptions {
            max_attempts: 0,
            ..PollOptions::default()
        };
        assert_eq!(opts.effective_attempts(), 1);
        assert_eq!(opts.worst_case(), Duration::from_millis(2_000));
    }

    #[test]
    fn slow_polling_is_flagged() {
        let opts = PollOptions {
            max_attempts: 30,
            ..PollOptions::default()
        };
        assert!(!opts.fits_setup_timeout());
    }
}
