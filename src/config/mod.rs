use std::env;

use crate::errors::SyncError;

/// Run configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Veracode application GUID whose SCA findings are fetched.
    pub app_guid: String,
    /// Veracode API id, possibly carrying a non-secret `prefix-` segment.
    pub api_id: String,
    /// Veracode API key, possibly carrying a non-secret `prefix-` segment.
    pub api_key: String,
    pub github_token: String,
    pub github_owner: String,
    pub github_repo: String,
    /// Minimum CVSS score for issue creation. Parsed for completeness but
    /// not consulted by the reconciliation logic.
    pub min_cvss_for_issue: f64,
    /// Scan path. Not used by the reconciliation logic.
    pub scan_path: String,
    pub debug: bool,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, SyncError> {
        Ok(Self {
            app_guid: required("VERACODE_APP_GUID")?,
            api_id: required("VERACODE_API_ID")?,
            api_key: required("VERACODE_API_KEY")?,
            github_token: required("GITHUB_TOKEN")?,
            github_owner: required("GITHUB_OWNER")?,
            github_repo: required("GITHUB_REPO")?,
            min_cvss_for_issue: env::var("MIN_CVSS_FOR_ISSUE")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap_or(0.0),
            scan_path: env::var("SCAN_PATH").unwrap_or_else(|_| ".".to_string()),
            debug: env::var("DEBUG")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

fn required(name: &str) -> Result<String, SyncError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SyncError::Config(format!("{name} is not set"))),
    }
}
