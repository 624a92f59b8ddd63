//! JWT token encoding and decoding using HS256.
//!
//! The token subject is the grower's username. Verification is exposed
//! through the [`TokenVerifier`] seam so the HTTP layer only ever asks
//! "which username does this token belong to?".

use crate::error::ServiceError;
use anyhow::{Context, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the username)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Resolves a bearer token to the username that owns it.
pub trait TokenVerifier: Send + Sync {
    fn verify_username(&self, token: &str) -> Result<String, ServiceError>;
}

/// HS256 verifier keyed by the configured secret
pub struct JwtVerifier {
    secret: String,
}

impl JwtVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify_username(&self, token: &str) -> Result<String, ServiceError> {
        let claims = decode_jwt(token, &self.secret)
            .map_err(|e| ServiceError::Unauthorized(format!("Invalid token: {:#}", e)))?;
        if claims.sub.trim().is_empty() {
            return Err(ServiceError::Unauthorized(
                "Token has no subject".to_string(),
            ));
        }
        Ok(claims.sub)
    }
}

/// Encode a JWT token for the given username.
///
/// Uses HS256 signing with the provided secret.
pub fn encode_jwt(username: &str, secret: &str, expiry_secs: u64) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: username.to_string(),
        iat: now,
        exp: now + expiry_secs as i64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT")
}

/// Decode and validate a JWT token.
///
/// Returns the claims if the token is valid, not expired, and
/// signed with the correct secret.
pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims> {
    let token_data: TokenData<Claims> = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT")?;

    Ok(token_data.claims)
}

// ============================================================================
// Tests
// ============================================================================
