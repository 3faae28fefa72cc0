//! Once-per-run test setup.
//!
//! Rust test harnesses have no "before all tests" hook, so setup is shared
//! through a [`ReadyGate`] that every test awaits. The first test runs the
//! wait; the rest receive the memoized outcome.

use tokio::{sync::OnceCell, time::timeout};

use crate::{HealthReport, ReadinessPoller, ReadyError, Result};

/// Waits for the emulator under the poller's outer setup timeout.
///
/// Propagates [`ReadyError::Timeout`] when the poller gives up and
/// [`ReadyError::SetupTimeout`] when the outer bound fires first.
pub async fn before_all(poller: &ReadinessPoller) -> Result<HealthReport> {
    let options = poller.options();

    #[cfg(feature = "tracing")]
    if !options.fits_setup_timeout() {
        tracing::warn!(
            worst_case_ms = options.worst_case().as_millis() as u64,
            setup_timeout_ms = options.setup_timeout_ms,
            "readiness polling can outlast the setup timeout"
        );
    }

    match timeout(options.setup_timeout(), poller.wait_until_ready()).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ReadyError::SetupTimeout {
            timeout_ms: options.setup_timeout_ms,
        }),
    }
}

/// Shares one readiness wait between all tests that await it.
///
/// # Example
///
/// ```no_run
/// use std::sync::OnceLock;
///
/// use localstack_ready::{ReadinessPoller, ReadyGate};
///
/// static GATE: OnceLock<ReadyGate> = OnceLock::new();
///
/// async fn setup() {
///     GATE.get_or_init(ReadyGate::new)
///         .wait(&ReadinessPoller::default())
///         .await
///         .expect("LocalStack must be ready before tests run");
/// }
/// ```
#[derive(Debug, Default)]
pub struct ReadyGate {
    outcome: OnceCell<Result<HealthReport>>,
}

impl ReadyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs [`before_all`] on first call and returns its outcome to every
    /// caller, including concurrent ones. A failed setup stays failed.
    pub async fn wait(&self, poller: &ReadinessPoller) -> Result<HealthReport> {
        self.outcome
            .get_or_init(|| before_all(poller))
            .await
            .clone()
    }

    /// Outcome of the setup, if it has finished.
    pub fn outcome(&self) -> Option<&Result<HealthReport>> {
        self.outcome.get()
    }
}
