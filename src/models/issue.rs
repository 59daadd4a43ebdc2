//! GitHub issue models: tracked items, labels, and creation payloads.

use serde::{Deserialize, Serialize};

/// Label marking an issue as owned by this reconciliation process. Only
/// issues carrying it are fetched, so issues created by hand are invisible
/// to the close pass even when their titles collide.
pub const SENTINEL_LABEL_NAME: &str = "Veracode";

/// An existing open issue retrieved from the tracker.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrackedItem {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// A label attached to newly created issues. Labels never participate in
/// matching; identity lives entirely in the title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub color: String,
    pub description: String,
}

impl Label {
    pub fn team(team: &str) -> Self {
        Self {
            name: format!("Team: {team}"),
            color: "0AA2DC".to_string(),
            description: "Team".to_string(),
        }
    }

    pub fn service(service: &str) -> Self {
        Self {
            name: format!("Service: {service}"),
            color: "A90533".to_string(),
            description: "Service".to_string(),
        }
    }

    pub fn severity(severity: &str) -> Self {
        Self {
            name: format!("Severity: {severity}"),
            color: "FF0000".to_string(),
            description: "Severity".to_string(),
        }
    }

    pub fn sentinel() -> Self {
        Self {
            name: SENTINEL_LABEL_NAME.to_string(),
            color: "00B3E6".to_string(),
            description: "Veracode SCA finding".to_string(),
        }
    }
}

/// Payload for one issue creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueCreate {
    pub title: String,
    pub body: String,
    pub labels: Vec<Label>,
}
