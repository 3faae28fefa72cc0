//! `localstack-ready` waits for a LocalStack emulator to report readiness
//! before a test run proceeds.
//!
//! The crate polls the emulator's `/health` endpoint with a bounded retry
//! loop:
//! - [`ReadinessPoller::check_once`]
//! - [`ReadinessPoller::wait_until_ready`]
//! - [`ReadyGate::wait`] for once-per-run test setup

mod criteria;
mod error;
mod gate;
mod options;
mod poller;
mod retry;
mod types;
mod wire;

pub use criteria::ReadinessCriteria;
pub use error::{ProbeError, ReadyError};
pub use gate::{before_all, ReadyGate};
pub use options::PollOptions;
pub use poller::{health_url, ReadinessPoller, DEFAULT_HEALTH_URL};
pub use retry::{retry, RetryExhausted};
pub use types::HealthReport;

pub type Result<T> = std::result::Result<T, ReadyError>;
