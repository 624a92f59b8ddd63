//! Auth middleware for Axum routes.
//!
//! Validates Bearer tokens and injects the verified username into request extensions.
//! Implements deny-by-default: if no token verifier is configured, all requests are rejected.

use crate::api::handlers::{AgroState, AppError};
use crate::auth::extractor::AuthUser;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Extract the token from an `Authorization: Bearer <token>` header value
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that requires a valid JWT Bearer token.
///
/// # Behavior
/// 1. If no verifier is configured → 403 Forbidden (deny-by-default)
/// 2. Extract `Authorization: Bearer <token>` header → 401 if missing or malformed
/// 3. Resolve the token to a username → 401 if invalid/expired
/// 4. Inject `AuthUser` into request extensions for downstream handlers
pub async fn require_auth(
    State(state): State<AgroState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let verifier = state.token_verifier.as_ref().ok_or_else(|| {
        AppError::Forbidden("Authentication not configured, access denied".to_string())
    })?;

    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = bearer_token(auth_header).ok_or_else(|| {
        AppError::Unauthorized("Bearer token not found in Authorization header".to_string())
    })?;

    let username = verifier.verify_username(token)?;

    req.extensions_mut().insert(AuthUser { username });

    Ok(next.run(req).await)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{encode_jwt, Claims};
    use crate::test_helpers::{mock_server_state, TEST_SECRET};
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt; // for `oneshot`

    /// Build a test router with the auth middleware applied
    fn test_app(with_auth: bool) -> Router {
        let state = mock_server_state(with_auth);

        async fn whoami(user: AuthUser) -> String {
            user.username
        }

        Router::new()
            .route("/test", get(whoami))
            .layer(from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    fn request(auth: Option<String>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().uri("/test");
        if let Some(value) = auth {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("bearer abc"), None);
    }

    #[tokio::test]
    async fn test_no_verifier_returns_403() {
        let token = encode_jwt("alice", TEST_SECRET, 3600).unwrap();
        let resp = test_app(false)
            .oneshot(request(Some(format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_no_header_returns_401() {
        let resp = test_app(true).oneshot(request(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_header_returns_401() {
        let resp = test_app(true)
            .oneshot(request(Some("Token abc".to_string())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_returns_401() {
        let resp = test_app(true)
            .oneshot(request(Some("Bearer invalid.token.here".to_string())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_returns_401() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "alice".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let resp = test_app(true)
            .oneshot(request(Some(format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_injects_username() {
        let token = encode_jwt("alice", TEST_SECRET, 3600).unwrap();
        let resp = test_app(true)
            .oneshot(request(Some(format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"alice");
    }
}
