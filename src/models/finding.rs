//! Veracode SCA findings payload (subset).
//!
//! Only the fields the normalizer consumes are modeled; everything else in
//! the provider response is ignored. Optional leaves default so one sparse
//! record cannot fail deserialization of the whole envelope.

use serde::Deserialize;

/// Top-level HAL envelope of the findings endpoint.
///
/// Veracode omits `_embedded` entirely when the application has no
/// findings, so the member defaults to empty.
#[derive(Debug, Deserialize)]
pub struct FindingsResponse {
    #[serde(rename = "_embedded", default)]
    pub embedded: EmbeddedFindings,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmbeddedFindings {
    #[serde(default)]
    pub findings: Vec<RawFinding>,
}

/// One raw SCA finding as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFinding {
    #[serde(default)]
    pub description: String,
    pub finding_details: FindingDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindingDetails {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub component_filename: String,
    #[serde(default)]
    pub component_path: Vec<ComponentPath>,
    pub cve: Cve,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentPath {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cve {
    pub name: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub cvss3: Cvss3,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cvss3 {
    #[serde(default)]
    pub score: f64,
}
