//! Unified error handling for a reconciliation run.
//!
//! Every variant here is fatal to the run. Malformed individual records are
//! deliberately not represented: the normalizer skips them with a warning
//! instead of aborting a whole run on one bad component path.

/// Top-level error type for a sync run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Missing or malformed credential/identifier. Raised before any
    /// network call is made.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request URL handed to the signature engine was not a valid
    /// absolute URL.
    #[error("Invalid request URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A read call to Veracode or GitHub failed. No reconciliation is
    /// attempted without both snapshots.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// An issue create or close call failed. The run aborts; mutations
    /// already applied in the same batch are not rolled back.
    #[error("Mutation failed: {0}")]
    Mutation(String),
}

impl SyncError {
    /// Check whether this error occurred before any network call.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UrlParse(_))
    }

    /// Check whether this error left the tracker potentially half-mutated.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Mutation(_))
    }
}
