//! HTTP collaborators with narrow contracts: the scan provider (read-only)
//! and the issue tracker (read plus create/close).

pub mod github;
pub mod veracode;
