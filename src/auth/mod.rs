//! Authentication module: bearer JWT verification
//!
//! Provides:
//! - JWT token encoding/decoding and the `TokenVerifier` seam (`jwt` submodule)
//! - `require_auth` middleware for the `/api` routes (`middleware` submodule)
//! - `AuthUser` extractor for handlers (`extractor` submodule)

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::AuthUser;
pub use jwt::{JwtVerifier, TokenVerifier};
