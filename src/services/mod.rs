//! Core reconciliation logic and the provider signature scheme.

pub mod normalize;
pub mod reconcile;
pub mod signature;
pub mod sync;
