//! Short prefixed identifiers
//!
//! An identifier is the caller's prefix followed by the first 8 hex characters
//! of a random UUID v4. 32 bits of randomness is plenty for an in-memory demo
//! store; it is not meant to be collision-proof.

use uuid::Uuid;

/// Length of the random token appended to the prefix
pub const TOKEN_LEN: usize = 8;

/// Prefix for user identifiers
pub const USER_PREFIX: &str = "u_";

/// Prefix for product identifiers
pub const PRODUCT_PREFIX: &str = "p_";

/// Prefix for per-request tracking values
pub const TRACKING_PREFIX: &str = "req_";

/// Generate a short identifier with the given prefix (which may be empty)
pub fn generate_id(prefix: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &token[..TOKEN_LEN])
}
