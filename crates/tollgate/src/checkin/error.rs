//! Error types for the check-in system

use thiserror::Error;

/// Check-in error type
#[derive(Error, Debug)]
pub enum CheckinError {
    #[error("Capture input unavailable: {0}")]
    InputUnavailable(String),

    #[error("Store error: {0}")]
    Store(#[from] tollgate_store::StoreError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckinError>;
