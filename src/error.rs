//! Error types shared across the crate

use thiserror::Error;

/// Misuse of the list store
///
/// These signal a caller bug rather than a runtime condition and are
/// propagated out of the workflow unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("No user lists found")]
    NotFound,
    #[error("Unhandled action type: {0}")]
    UnhandledAction(String),
}

pub use crate::client::ApiError;
