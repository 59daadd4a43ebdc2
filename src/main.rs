use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use veracode_sync::config::SyncConfig;
use veracode_sync::services::sync;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = SyncConfig::from_env()?;

    let default_filter = if config.debug {
        "veracode_sync=debug"
    } else {
        "veracode_sync=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        owner = %config.github_owner,
        repo = %config.github_repo,
        "starting Veracode issue reconciliation"
    );

    let report = sync::run(&config).await?;
    tracing::info!(
        findings = report.findings,
        open_issues = report.open_issues,
        created = report.created,
        closed = report.closed,
        "reconciliation run complete"
    );

    Ok(())
}
