//! Configuration for review sessions and service access.

use crate::collation::NormalizerConfig;
use crate::error::{CollatioError, Result};

/// Environment variable holding the backend base URL.
pub const SERVICE_URL_ENV: &str = "COLLATIO_SERVICE_URL";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "COLLATIO_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the collation and storage services live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Read `COLLATIO_SERVICE_URL` and `COLLATIO_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(SERVICE_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                CollatioError::Config(format!("{} environment variable not set", SERVICE_URL_ENV))
            })?;

        let timeout_secs = match lookup(TIMEOUT_ENV) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                CollatioError::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    TIMEOUT_ENV, raw
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout_secs,
        })
    }
}

/// Settings for a review session.
#[derive(Debug, Clone, Default)]
pub struct ReviewConfig {
    /// How reports are turned into comparisons.
    pub normalizer: NormalizerConfig,
    /// Remote services, if any. `None` means everything is file-backed.
    pub service: Option<ServiceConfig>,
}

impl ReviewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.service = Some(service);
        self
    }
}
