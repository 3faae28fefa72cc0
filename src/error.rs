/// Failure of a single health-check attempt.
///
/// The poller treats every variant as "not ready" and tries again.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Response body is not a health document.
    #[error("decode error: {0}")]
    Decode(String),
    /// Health document parsed but a monitored service is not up yet.
    #[error("service '{service}' not ready (status: {})", .status.as_deref().unwrap_or("missing"))]
    NotReady {
        /// Monitored service name.
        service: String,
        /// Reported status, `None` when the service is absent.
        status: Option<String>,
    },
}

/// Error type returned by this crate.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReadyError {
    /// Every attempt was spent without the emulator reporting ready.
    #[error("LocalStack did not start in time: {url} not ready after {attempts} attempt(s){}",
        .last_failure.as_ref().map(|f| format!("; last failure: {f}")).unwrap_or_default())]
    Timeout {
        /// Number of health checks made.
        attempts: usize,
        /// Health endpoint that was polled.
        url: String,
        /// Rendered reason of the final failed attempt.
        last_failure: Option<String>,
    },
    /// The enclosing setup timeout fired before the poller finished.
    #[error("LocalStack setup did not finish within {timeout_ms} ms")]
    SetupTimeout { timeout_ms: u64 },
    /// Invalid configuration, e.g. an unparsable environment variable.
    #[error("config error: {0}")]
    Config(String),
}
