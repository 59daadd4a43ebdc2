//! Create/close delta between current findings and open tracked issues.
//!
//! Pure set-difference keyed by title. Titles are compared by exact string
//! equality: any formatting drift between create time and a later run
//! produces false "stale" closures, so the title grammar in
//! [`crate::services::normalize`] is frozen.

use std::collections::HashSet;

use crate::models::issue::{IssueCreate, Label, TrackedItem};
use crate::services::normalize::{NormalizedFinding, CVE_MARKER};

/// The two mutation batches computed from one immutable snapshot pair.
/// Produced fresh each run, never persisted.
#[derive(Debug, Default, PartialEq)]
pub struct ReconciliationResult {
    pub to_create: Vec<IssueCreate>,
    pub to_close: Vec<TrackedItem>,
}

impl ReconciliationResult {
    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty() && self.to_close.is_empty()
    }
}

/// Compute the create and close sets.
///
/// Create: findings whose title matches no open issue, deduplicated within
/// the pass (first occurrence wins, so multiple raw findings collapsing to
/// one fingerprint stage a single creation).
///
/// Close: open issues carrying the CVE marker whose title matches no
/// current finding. Issues without the marker were not created from
/// findings and are never touched.
pub fn reconcile(
    findings: &[NormalizedFinding],
    open_items: &[TrackedItem],
) -> ReconciliationResult {
    let open_titles: HashSet<&str> = open_items.iter().map(|item| item.title.as_str()).collect();

    let mut staged_titles: HashSet<String> = HashSet::new();
    let mut to_create = Vec::new();
    for finding in findings {
        let title = finding.fingerprint();
        if open_titles.contains(title.as_str()) || staged_titles.contains(&title) {
            continue;
        }
        to_create.push(IssueCreate {
            body: finding.issue_body(),
            labels: vec![
                Label::team(&finding.team),
                Label::service(&finding.service),
                Label::severity(&finding.cve_severity),
                Label::sentinel(),
            ],
            title: title.clone(),
        });
        staged_titles.insert(title);
    }

    let finding_titles: HashSet<String> = findings.iter().map(|f| f.fingerprint()).collect();
    let to_close = open_items
        .iter()
        .filter(|item| item.title.contains(CVE_MARKER))
        .filter(|item| !finding_titles.contains(&item.title))
        .cloned()
        .collect();

    ReconciliationResult {
        to_create,
        to_close,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(team: &str, service: &str, cve: &str, file: &str, version: &str) -> NormalizedFinding {
        NormalizedFinding {
            team: team.to_string(),
            service: service.to_string(),
            cve_name: cve.to_string(),
            cve_severity: "High".to_string(),
            cve_href: format!("https://nvd.nist.gov/vuln/detail/{cve}"),
            cvss3_score: 7.5,
            component_filename: file.to_string(),
            component_version: version.to_string(),
            description: "A vulnerable dependency".to_string(),
            language: "JAVA".to_string(),
        }
    }

    fn item(number: u64, title: &str) -> TrackedItem {
        TrackedItem {
            number,
            title: title.to_string(),
            labels: vec!["Veracode".to_string()],
        }
    }

    const ALPHA_TITLE: &str = "[alpha][web]- CVE: CVE-2021-1 found in lib.jar - version: 1.0";

    #[test]
    fn new_finding_with_no_open_items_stages_one_create() {
        let findings = vec![finding("alpha", "web", "CVE-2021-1", "lib.jar", "1.0")];
        let result = reconcile(&findings, &[]);

        assert_eq!(result.to_create.len(), 1);
        assert_eq!(result.to_create[0].title, ALPHA_TITLE);
        assert!(result.to_close.is_empty());
    }

    #[test]
    fn matching_open_item_is_steady_state() {
        let findings = vec![finding("alpha", "web", "CVE-2021-1", "lib.jar", "1.0")];
        let items = vec![item(42, ALPHA_TITLE)];
        let result = reconcile(&findings, &items);
        assert!(result.is_noop());
    }

    #[test]
    fn stale_marked_item_is_staged_for_close() {
        let items = vec![item(42, ALPHA_TITLE)];
        let result = reconcile(&[], &items);

        assert!(result.to_create.is_empty());
        assert_eq!(result.to_close.len(), 1);
        assert_eq!(result.to_close[0].number, 42);
    }

    #[test]
    fn duplicate_titles_stage_exactly_one_create() {
        // Two component paths collapsing to the identical fingerprint.
        let findings = vec![
            finding("alpha", "web", "CVE-2021-1", "lib.jar", "1.0"),
            finding("alpha", "web", "CVE-2021-1", "lib.jar", "1.0"),
        ];
        let result = reconcile(&findings, &[]);
        assert_eq!(result.to_create.len(), 1);
    }

    #[test]
    fn unmarked_items_are_never_closed() {
        let items = vec![
            item(7, "Tracking: quarterly dependency upgrade"),
            item(8, ALPHA_TITLE),
        ];
        let result = reconcile(&[], &items);

        assert_eq!(result.to_close.len(), 1);
        assert_eq!(result.to_close[0].number, 8);
    }

    #[test]
    fn create_and_close_computed_from_same_snapshot() {
        let findings = vec![finding("alpha", "web", "CVE-2021-1", "lib.jar", "1.0")];
        let items = vec![item(
            42,
            "[beta][api]- CVE: CVE-2020-9 found in old.jar - version: 0.1",
        )];
        let result = reconcile(&findings, &items);

        assert_eq!(result.to_create.len(), 1);
        assert_eq!(result.to_create[0].title, ALPHA_TITLE);
        assert_eq!(result.to_close.len(), 1);
        assert_eq!(result.to_close[0].number, 42);
    }

    #[test]
    fn create_is_idempotent_once_reflected_into_items() {
        let findings = vec![
            finding("alpha", "web", "CVE-2021-1", "lib.jar", "1.0"),
            finding("beta", "api", "CVE-2021-2", "other.jar", "2.0"),
        ];
        let first = reconcile(&findings, &[]);
        assert_eq!(first.to_create.len(), 2);

        // Reflect the first run's creates back as open items.
        let items: Vec<TrackedItem> = first
            .to_create
            .iter()
            .enumerate()
            .map(|(i, create)| item(i as u64 + 1, &create.title))
            .collect();

        let second = reconcile(&findings, &items);
        assert!(second.is_noop());
    }

    #[test]
    fn staged_create_carries_all_four_labels() {
        let findings = vec![finding("alpha", "web", "CVE-2021-1", "lib.jar", "1.0")];
        let result = reconcile(&findings, &[]);

        let names: Vec<&str> = result.to_create[0]
            .labels
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Team: alpha", "Service: web", "Severity: High", "Veracode"]
        );
    }

    #[test]
    fn first_occurrence_wins_on_duplicate_titles() {
        let mut second = finding("alpha", "web", "CVE-2021-1", "lib.jar", "1.0");
        second.description = "later duplicate with different body".to_string();
        let findings = vec![
            finding("alpha", "web", "CVE-2021-1", "lib.jar", "1.0"),
            second,
        ];
        let result = reconcile(&findings, &[]);

        assert_eq!(result.to_create.len(), 1);
        assert!(result.to_create[0].body.contains("A vulnerable dependency"));
    }

    #[test]
    fn close_preserves_item_order() {
        let items = vec![
            item(3, "[a][b]- CVE: CVE-1 found in x.jar - version: 1"),
            item(1, "[c][d]- CVE: CVE-2 found in y.jar - version: 2"),
        ];
        let result = reconcile(&[], &items);
        let numbers: Vec<u64> = result.to_close.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![3, 1]);
    }
}
