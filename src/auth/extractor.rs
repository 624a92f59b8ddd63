//! AuthUser extractor for Axum handlers.
//!
//! Extracts the authenticated username from request extensions
//! (populated by the `require_auth` middleware).

use crate::api::handlers::{AgroState, AppError};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Verified identity of the caller.
///
/// Use this as a handler parameter to require authentication:
///
/// ```rust,ignore
/// async fn my_handler(user: AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
}

impl FromRequestParts<AgroState> for AuthUser {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &AgroState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async {
            parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
                AppError::Unauthorized(
                    "Authentication required: no verified user in request".to_string(),
                )
            })
        }
    }
}
