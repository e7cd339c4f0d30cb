//! Shared data models for the Users and Products domains
//!
//! REST payloads and repository records. gRPC messages are generated from the
//! protos and converted at the service boundary.

use serde::{Deserialize, Serialize};

// ============================================================================
// USERS
// ============================================================================

/// Payload for creating a user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
}

/// Stored user record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn from_payload(id: String, payload: UserCreate) -> Self {
        Self {
            id,
            name: payload.name,
            email: payload.email,
        }
    }
}

// ============================================================================
// PRODUCTS
// ============================================================================

/// Payload for creating a product
///
/// `user_id` is an optional reference to the owning user. Both a missing
/// field and an explicit `null` mean "no owner".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Stored product record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Product {
    pub fn from_payload(id: String, payload: ProductCreate) -> Self {
        Self {
            id,
            name: payload.name,
            price: payload.price,
            user_id: payload.user_id,
        }
    }
}
