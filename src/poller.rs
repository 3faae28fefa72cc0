use std::fmt;
use std::str::FromStr;

use crate::{
    retry, HealthReport, PollOptions, ProbeError, ReadinessCriteria, ReadyError, Result,
};

/// Health endpoint of LocalStack as seen from inside a dev container.
pub const DEFAULT_HEALTH_URL: &str = "http://host.docker.internal:4566/health";

/// Formats a host and port into the health-check URL.
///
/// Example: `("localhost", 4566)` → `"http://localhost:4566/health"`
///
/// IPv6 literals are bracketed: `("::1", 4566)` → `"http://[::1]:4566/health"`
pub fn health_url(host: &str, port: u16) -> String {
    let host = host.trim();
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{host}]:{port}/health")
    } else {
        format!("http://{host}:{port}/health")
    }
}

#[derive(Clone)]
/// Polls an emulator health endpoint until it reports ready.
pub struct ReadinessPoller {
    http: reqwest::Client,
    health_url: String,
    criteria: ReadinessCriteria,
    options: PollOptions,
}

impl fmt::Debug for ReadinessPoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadinessPoller")
            .field("health_url", &self.health_url)
            .field("criteria", &self.criteria)
            .field("options", &self.options)
            .finish()
    }
}

impl Default for ReadinessPoller {
    fn default() -> Self {
        Self::new(DEFAULT_HEALTH_URL)
    }
}

impl ReadinessPoller {
    /// Creates a poller for a full health URL, waiting for `s3` to run.
    pub fn new(health_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            health_url: health_url.into(),
            criteria: ReadinessCriteria::default(),
            options: PollOptions::default(),
        }
    }

    /// Creates a poller for `http://<host>:<port>/health`.
    pub fn from_host_port(host: &str, port: u16) -> Self {
        Self::new(health_url(host, port))
    }

    /// Creates a poller from environment variables.
    ///
    /// Reads, all optional:
    /// - `LOCALSTACK_HEALTH_URL` : full health endpoint URL
    /// - `LOCALSTACK_SERVICES` : comma separated services that must run
    /// - `LOCALSTACK_MAX_ATTEMPTS`
    /// - `LOCALSTACK_RETRY_DELAY_MS`
    /// - `LOCALSTACK_REQUEST_TIMEOUT_MS`
    /// - `LOCALSTACK_SETUP_TIMEOUT_MS`
    ///
    /// Returns [`ReadyError::Config`] if a variable is set but empty or
    /// not a number.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use localstack_ready::ReadinessPoller;
    ///
    /// let poller = ReadinessPoller::from_env().expect("invalid LOCALSTACK_* env vars");
    /// ```
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| -> Result<Option<String>> {
            match lookup(key) {
                None => Ok(None),
                Some(value) if value.trim().is_empty() => {
                    Err(ReadyError::Config(format!("{key} is set but empty")))
                }
                Some(value) => Ok(Some(value.trim().to_owned())),
            }
        };
        let number = |key: &str, default: u64| -> Result<u64> {
            var(key)?.map_or(Ok(default), |value| parse_number(key, &value))
        };

        let mut poller = match var("LOCALSTACK_HEALTH_URL")? {
            Some(url) => Self::new(url),
            None => Self::default(),
        };

        if let Some(services) = var("LOCALSTACK_SERVICES")? {
            let names: Vec<&str> = services
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .collect();
            if names.is_empty() {
                return Err(ReadyError::Config(
                    "LOCALSTACK_SERVICES lists no services".to_owned(),
                ));
            }
            poller.criteria = ReadinessCriteria::services(names);
        }

        let defaults = PollOptions::default();
        poller.options = PollOptions {
            max_attempts: number("LOCALSTACK_MAX_ATTEMPTS", defaults.max_attempts as u64)?
                as usize,
            retry_delay_ms: number("LOCALSTACK_RETRY_DELAY_MS", defaults.retry_delay_ms)?,
            request_timeout_ms: number(
                "LOCALSTACK_REQUEST_TIMEOUT_MS",
                defaults.request_timeout_ms,
            )?,
            setup_timeout_ms: number("LOCALSTACK_SETUP_TIMEOUT_MS", defaults.setup_timeout_ms)?,
        };

        Ok(poller)
    }

    /// Applies attempt count, delay and timeout settings.
    pub fn with_options(mut self, opts: PollOptions) -> Self {
        self.options = opts;
        self
    }

    /// Replaces the readiness predicate.
    pub fn with_criteria(mut self, criteria: ReadinessCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn health_url(&self) -> &str {
        &self.health_url
    }

    pub fn options(&self) -> &PollOptions {
        &self.options
    }

    pub fn criteria(&self) -> &ReadinessCriteria {
        &self.criteria
    }

    /// Issues one health check and reports whether the emulator is ready.
    ///
    /// Never fails: transport errors, timeouts, non-2xx responses and
    /// malformed bodies all count as "not ready".
    pub async fn check_once(&self) -> bool {
        match self.probe().await {
            Ok(_) => true,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(url = %self.health_url, error = %_err, "LocalStack not ready");
                false
            }
        }
    }

    /// One health check with the failure reason preserved.
    pub async fn probe(&self) -> std::result::Result<HealthReport, ProbeError> {
        let report = self.fetch_health().await?;
        self.criteria.check(&report)?;
        Ok(report)
    }

    /// Fetches and decodes the health document without applying the criteria.
    pub async fn fetch_health(&self) -> std::result::Result<HealthReport, ProbeError> {
        let response = self
            .http
            .get(&self.health_url)
            .timeout(self.options.request_timeout())
            .send()
            .await
            .map_err(ProbeError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ProbeError::Transport)?;

        if !status.is_success() {
            return Err(ProbeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        HealthReport::from_json(&body)
    }

    /// Polls until the emulator is ready or the attempts are spent.
    ///
    /// Makes at most [`PollOptions::max_attempts`] health checks (at least
    /// one) with [`PollOptions::retry_delay_ms`] between them, and returns
    /// the first report that satisfies the criteria. Fails with
    /// [`ReadyError::Timeout`] after the last failed attempt without
    /// sleeping again.
    pub async fn wait_until_ready(&self) -> Result<HealthReport> {
        let outcome = retry(
            self.options.effective_attempts(),
            self.options.retry_delay(),
            |_attempt| {
                // Only after a failed check.
                #[cfg(feature = "tracing")]
                if _attempt > 0 {
                    tracing::info!(
                        url = %self.health_url,
                        attempt = _attempt + 1,
                        "Waiting for LocalStack to be ready..."
                    );
                }
                self.probe()
            },
        )
        .await;

        match outcome {
            Ok(report) => {
                #[cfg(feature = "tracing")]
                tracing::info!(url = %self.health_url, "LocalStack is ready");
                Ok(report)
            }
            Err(exhausted) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    url = %self.health_url,
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "LocalStack did not start in time"
                );
                Err(ReadyError::Timeout {
                    attempts: exhausted.attempts,
                    url: self.health_url.clone(),
                    last_failure: Some(exhausted.last_error.to_string()),
                })
            }
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ReadyError::Config(format!("{key} must be a non-negative integer, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{health_url, ReadinessPoller, DEFAULT_HEALTH_URL};
    use crate::{PollOptions, ReadinessCriteria, ReadyError};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn health_url_trims_host() {
        assert_eq!(
            health_url(" localhost ", 4566),
            "http://localhost:4566/health".to_owned()
        );
    }

    #[test]
    fn health_url_brackets_ipv6_hosts() {
        assert_eq!(health_url("::1", 4566), "http://[::1]:4566/health");
        assert_eq!(health_url("[::1]", 4566), "http://[::1]:4566/health");
        assert_eq!(
            ReadinessPoller::from_host_port("fe80::1", 4510).health_url(),
            "http://[fe80::1]:4510/health"
        );
    }

    #[test]
    fn default_targets_docker_host() {
        let poller = ReadinessPoller::default();
        assert_eq!(poller.health_url(), DEFAULT_HEALTH_URL);
        assert_eq!(poller.criteria(), &ReadinessCriteria::service("s3"));
        assert_eq!(poller.options(), &PollOptions::default());
    }

    #[test]
    fn empty_environment_keeps_defaults() {
        let poller = ReadinessPoller::from_lookup(lookup(&[])).expect("defaults are valid");
        assert_eq!(poller.health_url(), DEFAULT_HEALTH_URL);
        assert_eq!(poller.options(), &PollOptions::default());
    }

    #[test]
    fn environment_overrides_url_services_and_options() {
        let poller = ReadinessPoller::from_lookup(lookup(&[
            ("LOCALSTACK_HEALTH_URL", "http://localhost:4566/_localstack/health"),
            ("LOCALSTACK_SERVICES", "s3, dynamodb,,sqs"),
            ("LOCALSTACK_MAX_ATTEMPTS", "5"),
            ("LOCALSTACK_RETRY_DELAY_MS", "0"),
            ("LOCALSTACK_REQUEST_TIMEOUT_MS", "500"),
            ("LOCALSTACK_SETUP_TIMEOUT_MS", "10000"),
        ]))
        .expect("environment is valid");

        assert_eq!(
            poller.health_url(),
            "http://localhost:4566/_localstack/health"
        );
        assert_eq!(
            poller.criteria(),
            &ReadinessCriteria::services(["s3", "dynamodb", "sqs"])
        );
        assert_eq!(
            poller.options(),
            &PollOptions {
                max_attempts: 5,
                retry_delay_ms: 0,
                request_timeout_ms: 500,
                setup_timeout_ms: 10_000,
            }
        );
    }

    #[test]
    fn unparsable_number_is_config_error() {
        let err = ReadinessPoller::from_lookup(lookup(&[("LOCALSTACK_MAX_ATTEMPTS", "ten")]))
            .expect_err("must reject");
        assert_eq!(
            err,
            ReadyError::Config(
                "LOCALSTACK_MAX_ATTEMPTS must be a non-negative integer, got 'ten'".to_owned()
            )
        );
    }

    #[test]
    fn empty_variable_is_config_error() {
        let err = ReadinessPoller::from_lookup(lookup(&[("LOCALSTACK_HEALTH_URL", "  ")]))
            .expect_err("must reject");
        assert!(matches!(err, ReadyError::Config(message) if message.contains("LOCALSTACK_HEALTH_URL")));
    }

    #[test]
    fn service_list_without_names_is_config_error() {
        for value in [",", " , ", ",,,"] {
            let err = ReadinessPoller::from_lookup(lookup(&[("LOCALSTACK_SERVICES", value)]))
                .expect_err("must reject a list with no services");
            assert_eq!(
                err,
                ReadyError::Config("LOCALSTACK_SERVICES lists no services".to_owned())
            );
        }
    }

    #[test]
    fn debug_shows_url_and_options() {
        let poller = ReadinessPoller::from_host_port("localhost", 4566);
        let debug = format!("{poller:?}");
        assert!(debug.contains("http://localhost:4566/health"));
        assert!(debug.contains("max_attempts: 10"));
    }
}
