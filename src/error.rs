//! Service-level error taxonomy and failure policy helpers
//!
//! Every domain operation declares one of three failure policies:
//! - **Propagate**: returns `Result<T, ServiceError>` and the caller sees the failure
//! - **Degrade**: returns a plain value, substituting a fallback on failure
//! - **Swallow**: returns `()`, failures are logged and dropped
//!
//! Degrading and swallowing operations are visible from their signatures:
//! they never return `Result`.

use std::fmt::Display;

/// Failure classes surfaced by the domain services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing, malformed, expired or otherwise rejected credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The requested record does not exist (or is not owned by the caller)
    #[error("not found: {0}")]
    NotFound(String),
    /// The graph store failed to answer
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] anyhow::Error),
    /// The request payload violates a domain constraint
    #[error("validation failed: {0}")]
    ValidationFailed(String),
}

impl ServiceError {
    pub fn not_found(what: impl Display) -> Self {
        Self::NotFound(what.to_string())
    }

    pub fn invalid(reason: impl Display) -> Self {
        Self::ValidationFailed(reason.to_string())
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        Self::StoreUnavailable(err)
    }
}

/// Apply the degrade policy: log the failure and return `fallback`.
pub(crate) fn degrade<T>(operation: &str, result: anyhow::Result<T>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(operation, error = %e, "Store failure degraded to fallback value");
            fallback
        }
    }
}
