//! Wire models for the two external collaborators.

pub mod finding;
pub mod issue;
