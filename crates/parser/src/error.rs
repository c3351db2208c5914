// Failure taxonomy for the parsing service.

use thiserror::Error;

/// The two failure kinds the bridge distinguishes. Both are logged to the
/// diagnostic stream; neither triggers a retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The pipeline could not be brought up: missing configuration, worker
    /// spawn failure, or a failed load handshake. Terminal for the bridge.
    #[error("pipeline initialization failed: {reason}")]
    Initialization { reason: String },

    /// A single annotate request failed. The bridge stays usable.
    #[error("parse request failed: {reason}")]
    Parse { reason: String },
}

impl ServiceError {
    pub fn initialization(reason: impl Into<String>) -> Self {
        Self::Initialization { reason: reason.into() }
    }

    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse { reason: reason.into() }
    }

    pub fn is_initialization(&self) -> bool {
        matches!(self, Self::Initialization { .. })
    }
}
