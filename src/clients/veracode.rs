//! Veracode findings client.
//!
//! One signed GET per run against the SCA findings endpoint. Retry,
//! backoff, and pagination are out of scope here; a failed or non-2xx
//! response fails the run.

use crate::errors::SyncError;
use crate::models::finding::{FindingsResponse, RawFinding};
use crate::services::signature;

const API_BASE: &str = "https://api.veracode.com";

pub struct VeracodeClient {
    http: reqwest::Client,
    api_id: String,
    api_key: String,
    base_url: String,
}

impl VeracodeClient {
    pub fn new(api_id: &str, api_key: &str) -> Self {
        Self::with_base_url(api_id, api_key, API_BASE)
    }

    /// Base-URL override for tests against a local server.
    pub fn with_base_url(api_id: &str, api_key: &str, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_id: api_id.to_string(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the full SCA findings snapshot for one application.
    pub async fn fetch_sca_findings(&self, app_guid: &str) -> Result<Vec<RawFinding>, SyncError> {
        let request_url = format!(
            "{}/appsec/v2/applications/{app_guid}/findings?scan_type=SCA",
            self.base_url
        );
        let authorization = signature::auth_header(&self.api_id, &self.api_key, "GET", &request_url)?;

        let response = self
            .http
            .get(&request_url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|err| SyncError::Fetch(format!("Veracode findings request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Fetch(format!(
                "Veracode findings request returned {status}"
            )));
        }

        let payload: FindingsResponse = response
            .json()
            .await
            .map_err(|err| SyncError::Fetch(format!("Veracode findings payload invalid: {err}")))?;

        tracing::debug!(
            findings = payload.embedded.findings.len(),
            "fetched SCA findings snapshot"
        );
        Ok(payload.embedded.findings)
    }
}
