//! HTTP client for the collation and storage services.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::collation::CollationReport;
use crate::config::ServiceConfig;
use crate::error::{CollatioError, Result};
use crate::review::{PersistedDecision, ReviewDecision};

use super::provider::{CollationSource, DecisionStore, VariationTypeStore};

const COLLATE_PATH: &str = "collate/";
const COMPARISONS_PATH: &str = "api/comparisons/";
const VARIATION_TYPES_PATH: &str = "api/variation-types/";

/// Error body returned by the services.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Variation-type list body.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypesPayload {
    Bare(Vec<String>),
    Wrapped { types: Vec<String> },
}

/// Client for the backend that hosts the collation endpoint, the comparison
/// store and the variation-type settings.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for the service at `config.base_url`.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(CollatioError::Config("service URL must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CollatioError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Create from environment variables (see [`ServiceConfig::from_env`]).
    pub fn from_env() -> Result<Self> {
        Self::new(&ServiceConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Turn a non-success response into a persistence error carrying the
/// service's own message when it sent one.
fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(CollatioError::Persistence(format!(
        "{} failed ({}): {}",
        what,
        status,
        error_message(status, &body)
    )))
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorPayload>(body) {
        Ok(ErrorPayload {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorPayload {
            error: Some(error), ..
        }) => error,
        _ if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string(),
        _ => body.trim().to_string(),
    }
}

fn transport_error(what: &str, err: reqwest::Error) -> CollatioError {
    CollatioError::Persistence(format!("{} request failed: {}", what, err))
}

impl CollationSource for HttpBackend {
    fn fetch_report(&self) -> Result<CollationReport> {
        let url = self.url(COLLATE_PATH);
        debug!(%url, "fetching collation report");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| transport_error("collation", e))?;
        let response = check_status(response, "collation")?;

        let value: Value = response.json().map_err(|e| {
            CollatioError::data_format("collation report", format!("invalid JSON: {}", e))
        })?;
        CollationReport::from_value(value)
    }

    fn name(&self) -> &str {
        "http"
    }
}

impl DecisionStore for HttpBackend {
    fn save_decision(&self, decision: &ReviewDecision) -> Result<PersistedDecision> {
        let url = self.url(COMPARISONS_PATH);
        debug!(%url, comparison = %decision.word_comparison(), "saving decision");

        let response = self
            .client
            .post(&url)
            .json(decision)
            .send()
            .map_err(|e| transport_error("save comparison", e))?;
        let response = check_status(response, "save comparison")?;

        response.json::<PersistedDecision>().map_err(|e| {
            CollatioError::Persistence(format!("Failed to parse saved comparison: {}", e))
        })
    }

    fn load_decisions(&self) -> Result<Vec<PersistedDecision>> {
        let response = self
            .client
            .get(self.url(COMPARISONS_PATH))
            .send()
            .map_err(|e| transport_error("list comparisons", e))?;

        // Older deployments only accept POST on this endpoint.
        if response.status() == StatusCode::METHOD_NOT_ALLOWED {
            return Ok(Vec::new());
        }
        let response = check_status(response, "list comparisons")?;

        response.json::<Vec<PersistedDecision>>().map_err(|e| {
            CollatioError::Persistence(format!("Failed to parse comparisons: {}", e))
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

impl VariationTypeStore for HttpBackend {
    fn fetch_types(&self) -> Result<Option<Vec<String>>> {
        let response = self
            .client
            .get(self.url(VARIATION_TYPES_PATH))
            .send()
            .map_err(|e| transport_error("variation types", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response, "variation types")?;

        let payload: TypesPayload = response.json().map_err(|e| {
            CollatioError::data_format("variation types", format!("invalid JSON: {}", e))
        })?;
        Ok(Some(match payload {
            TypesPayload::Bare(types) | TypesPayload::Wrapped { types } => types,
        }))
    }

    fn replace_types(&self, labels: &[String]) -> Result<()> {
        let response = self
            .client
            .put(self.url(VARIATION_TYPES_PATH))
            .json(&labels)
            .send()
            .map_err(|e| transport_error("replace variation types", e))?;
        check_status(response, "replace variation types")?;
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_url() {
        let config = ServiceConfig::new("  ");
        assert!(matches!(HttpBackend::new(&config), Err(CollatioError::Config(_))));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new(&ServiceConfig::new("http://localhost:8000/")).unwrap();
        assert_eq!(backend.url(COLLATE_PATH), "http://localhost:8000/collate/");
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"message": "duplicate comparison", "error": "x"}"#,
        );
        assert_eq!(msg, "duplicate comparison");
    }

    #[test]
    fn test_error_message_falls_back_to_error_field() {
        let msg = error_message(StatusCode::NOT_FOUND, r#"{"error": "Manuscript not found"}"#);
        assert_eq!(msg, "Manuscript not found");
    }

    #[test]
    fn test_error_message_empty_body() {
        let msg = error_message(StatusCode::BAD_GATEWAY, "");
        assert_eq!(msg, "Bad Gateway");
    }

    #[test]
    fn test_types_payload_shapes() {
        let bare: TypesPayload = serde_json::from_str(r#"["A", "B"]"#).unwrap();
        let wrapped: TypesPayload = serde_json::from_str(r#"{"types": ["A"]}"#).unwrap();
        assert!(matches!(bare, TypesPayload::Bare(ref t) if t.len() == 2));
        assert!(matches!(wrapped, TypesPayload::Wrapped { ref types } if types.len() == 1));
    }
}
