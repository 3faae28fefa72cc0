use crate::{HealthReport, ProbeError};

/// Decides whether a health report means "ready".
///
/// Every listed service must be present with one of the accepted statuses.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReadinessCriteria {
    pub services: Vec<String>,
    pub accepted_statuses: Vec<String>,
}

impl Default for ReadinessCriteria {
    fn default() -> Self {
        Self::service("s3")
    }
}

impl ReadinessCriteria {
    /// A single service that must report `"running"`.
    pub fn service(name: impl Into<String>) -> Self {
        Self::services([name])
    }

    /// Several services that must all report `"running"`.
    pub fn services<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            services: names.into_iter().map(Into::into).collect(),
            accepted_statuses: vec!["running".to_owned()],
        }
    }

    /// Also accepts `status` as ready, e.g. `"available"`.
    pub fn accept_status(mut self, status: impl Into<String>) -> Self {
        self.accepted_statuses.push(status.into());
        self
    }

    pub fn is_satisfied(&self, report: &HealthReport) -> bool {
        self.check(report).is_ok()
    }

    /// Returns the first monitored service that is not ready.
    pub(crate) fn check(&self, report: &HealthReport) -> Result<(), ProbeError> {
        for service in &self.services {
            let status = report.status(service);
            let accepted = status.is_some_and(|status| {
                self.accepted_statuses
                    .iter()
                    .any(|accepted| accepted == status)
            });
            if !accepted {
                return Err(ProbeError::NotReady {
                    service: service.clone(),
                    status: status.map(str::to_owned),
                });
            }
        }
        Ok(())
    }
}
