//! Test helper factories and mock state builders
//!
//! Provides convenience functions for creating test objects with sensible defaults,
//! and helpers for building mock server state.
#![allow(dead_code)]

use crate::api::handlers::{AgroState, ServerState};
use crate::auth::jwt::encode_jwt;
use crate::auth::{JwtVerifier, TokenVerifier};
use crate::farm::CreateFarmRequest;
use crate::neo4j::mock::MockGraphStore;
use crate::neo4j::models::*;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Signing secret shared by tests that issue and verify tokens
pub const TEST_SECRET: &str = "test-secret-key-minimum-32-chars!!";

// ============================================================================
// Mock state builders
// ============================================================================

/// Server state over an empty mock store, with or without a token verifier
pub fn mock_server_state(with_auth: bool) -> AgroState {
    let verifier = with_auth.then(test_verifier);
    Arc::new(ServerState::new(Arc::new(MockGraphStore::new()), verifier))
}

/// Server state over a caller-provided store, auth enabled
pub fn mock_server_state_with(store: Arc<MockGraphStore>) -> AgroState {
    Arc::new(ServerState::new(store, Some(test_verifier())))
}

fn test_verifier() -> Arc<dyn TokenVerifier> {
    Arc::new(JwtVerifier::new(TEST_SECRET))
}

/// A valid one-hour token for `username`
pub fn test_bearer_token(username: &str) -> String {
    encode_jwt(username, TEST_SECRET, 3600).expect("encode test token")
}

// ============================================================================
// Factories
// ============================================================================

pub fn test_farm_request(name: &str) -> CreateFarmRequest {
    CreateFarmRequest {
        farm_name: name.to_string(),
        crop_type: "rice".to_string(),
        description: None,
        location: Some(GeoPoint {
            lat: 14.5995,
            lng: 120.9842,
        }),
        image: None,
    }
}

pub fn test_farm_owned_by(owner: &str, name: &str) -> FarmNode {
    let now = Utc::now();
    FarmNode {
        id: Uuid::new_v4().to_string(),
        farm_name: name.to_string(),
        crop_type: "rice".to_string(),
        description: Some(format!("{} test plot", name)),
        owner: owner.to_string(),
        created_at: now,
        updated_at: now,
        location: Some(GeoPoint {
            lat: 14.5995,
            lng: 120.9842,
        }),
        image: None,
    }
}
