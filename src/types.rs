use std::collections::BTreeMap;

use crate::{wire, ProbeError};

/// Decoded emulator health document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HealthReport {
    /// Service name to status, e.g. `"s3" => "running"`.
    pub services: BTreeMap<String, String>,
    pub version: Option<String>,
    pub edition: Option<String>,
}

impl HealthReport {
    /// Parses a health response body.
    pub fn from_json(body: &str) -> Result<Self, ProbeError> {
        let response = serde_json::from_str::<wire::HealthResponse>(body).map_err(|err| {
            ProbeError::Decode(format!("invalid health response JSON: {err}; body: {body}"))
        })?;
        Ok(Self::from(response))
    }

    pub fn status(&self, service: &str) -> Option<&str> {
        self.services.get(service).map(String::as_str)
    }
}

impl From<wire::HealthResponse> for HealthReport {
    fn from(response: wire::HealthResponse) -> Self {
        let services = response
            .services
            .into_iter()
            .map(|(name, status)| {
                let status = match status {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                (name, status)
            })
            .collect();

        Self {
            services,
            version: response.version,
            edition: response.edition,
        }
    }
}
