//! Run orchestrator: fetch both snapshots, reconcile, apply mutations.
//!
//! The two fetches run concurrently and must both complete before
//! reconciliation; the mutation batches are sequenced awaits so a failure
//! is observed and fails the run (no rollback of mutations already
//! applied — a rerun relies on the idempotent skip-by-title check).

use std::time::Duration;

use crate::clients::github::GithubClient;
use crate::clients::veracode::VeracodeClient;
use crate::config::SyncConfig;
use crate::errors::SyncError;
use crate::services::{normalize, reconcile};

/// Pause before the close batch so the tracker's indexing and rate-limit
/// state settles. A throttle, not a correctness need.
const SETTLE_PAUSE: Duration = Duration::from_secs(10);

/// Summary of one reconciliation run, for logging.
#[derive(Debug)]
pub struct SyncReport {
    pub findings: usize,
    pub open_issues: usize,
    pub created: usize,
    pub closed: usize,
}

/// Execute one full reconciliation run.
pub async fn run(config: &SyncConfig) -> Result<SyncReport, SyncError> {
    let veracode = VeracodeClient::new(&config.api_id, &config.api_key);
    let github = GithubClient::new(
        &config.github_token,
        &config.github_owner,
        &config.github_repo,
    );

    run_with_clients(config, &veracode, &github).await
}

/// Orchestration over injected clients, so tests can point both at local
/// servers.
pub async fn run_with_clients(
    config: &SyncConfig,
    veracode: &VeracodeClient,
    github: &GithubClient,
) -> Result<SyncReport, SyncError> {
    tracing::info!(app_guid = %config.app_guid, "fetching findings and open issues");
    let (raw_findings, open_items) = tokio::try_join!(
        veracode.fetch_sca_findings(&config.app_guid),
        github.list_open_issues(),
    )?;

    let findings = normalize::normalize_findings(&raw_findings);
    let result = reconcile::reconcile(&findings, &open_items);
    tracing::info!(
        findings = findings.len(),
        open_issues = open_items.len(),
        to_create = result.to_create.len(),
        to_close = result.to_close.len(),
        "reconciliation computed"
    );

    for issue in &result.to_create {
        github.create_issue(issue).await?;
        tracing::info!(title = %issue.title, "created issue");
    }

    if !result.to_close.is_empty() {
        tokio::time::sleep(SETTLE_PAUSE).await;
        for item in &result.to_close {
            github.close_issue(item).await?;
            tracing::info!(number = item.number, title = %item.title, "closed issue");
        }
    }

    Ok(SyncReport {
        findings: findings.len(),
        open_issues: open_items.len(),
        created: result.to_create.len(),
        closed: result.to_close.len(),
    })
}
