//! Normalization of raw Veracode findings into flat, fingerprinted records.
//!
//! A raw finding fans out to one `NormalizedFinding` per component path.
//! The fingerprint doubles as the GitHub issue title and is the sole join
//! key against previously created issues, so its grammar must not drift.

use crate::models::finding::RawFinding;

/// Marker distinguishing findings-derived issue titles from everything
/// else in the repository.
pub const CVE_MARKER: &str = "- CVE:";

/// One finding flattened to a single component path, immutable for the
/// duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFinding {
    pub team: String,
    pub service: String,
    pub cve_name: String,
    pub cve_severity: String,
    pub cve_href: String,
    pub cvss3_score: f64,
    pub component_filename: String,
    pub component_version: String,
    pub description: String,
    pub language: String,
}

impl NormalizedFinding {
    /// Stable identity string, reused verbatim as the issue title.
    ///
    /// Depends only on team, service, CVE name, component filename, and
    /// version; never on ordering, timestamps, or volatile fields. The
    /// exact spacing (including `]- CVE:`) matches issues created by
    /// earlier runs and must stay byte-identical.
    pub fn fingerprint(&self) -> String {
        format!(
            "[{}][{}]{} {} found in {} - version: {}",
            self.team,
            self.service,
            CVE_MARKER,
            self.cve_name,
            self.component_filename,
            self.component_version,
        )
    }

    /// Markdown body for the created issue: a fixed attribute table whose
    /// field order and labels are part of the contract when humans diff
    /// issue bodies across runs.
    pub fn issue_body(&self) -> String {
        format!(
            concat!(
                "Veracode Software Composition Analysis",
                "  \n===============================\n",
                "  \n Attribute | Details",
                "  \n| --- | --- |",
                "  \nLibrary | {}",
                "  \nDescription | {}",
                "  \nLanguage | {}",
                "  \nVulnerability | {}",
                "  \nCVE | {}",
                "  \nCVSS score | {}"
            ),
            self.component_version,
            self.description,
            self.language,
            self.cve_href,
            self.cve_name,
            self.cvss3_score,
        )
    }
}

/// Expand raw findings into normalized records, one per component path,
/// preserving input order.
///
/// Component paths with fewer than three `-`-separated tokens carry no
/// team/service coordinates; those paths are skipped with a warning rather
/// than failing the run.
pub fn normalize_findings(raw: &[RawFinding]) -> Vec<NormalizedFinding> {
    let mut normalized = Vec::new();

    for finding in raw {
        let details = &finding.finding_details;
        for component_path in &details.component_path {
            let tokens: Vec<&str> = component_path.path.split('-').collect();
            let (Some(team), Some(service)) = (tokens.get(1), tokens.get(2)) else {
                tracing::warn!(
                    path = %component_path.path,
                    cve = %details.cve.name,
                    "skipping component path without team/service tokens"
                );
                continue;
            };

            normalized.push(NormalizedFinding {
                team: team.to_string(),
                service: service.to_string(),
                cve_name: details.cve.name.clone(),
                cve_severity: details.cve.severity.clone(),
                cve_href: details.cve.href.clone(),
                cvss3_score: details.cve.cvss3.score,
                component_filename: details.component_filename.clone(),
                component_version: details.version.clone(),
                description: finding.description.clone(),
                language: details.language.clone(),
            });
        }
    }

    normalized
}
