//! Shared wire types for the festival API.
//!
//! Types in this crate cross the HTTP boundary between the server and
//! its clients (admin back-office, registration front-end). Anything
//! serialized into a request or response body that more than one
//! consumer touches lives here; handler-local request shapes stay next
//! to their handlers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Common envelopes
// ============================================================================

/// Error body attached to every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Message-only success body (deletes, reorders).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub gender: Option<String>,
    /// Expected as "YYYY-MM-DD".
    pub dob: Option<String>,
}

/// Public view of a user account (no credential material).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub user_name: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    /// Bearer token for subsequent admin calls.
    pub token: Uuid,
    pub user: AuthUser,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Sponsor display ordering
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SponsorOrder {
    pub id: i64,
    pub order: i32,
}

/// Body of `PATCH /api/admin/sponsors/reorder`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub orders: Vec<SponsorOrder>,
}

// ============================================================================
// JSON-carried image uploads
// ============================================================================

/// Image payload embedded in a JSON request body. The server decodes
/// `content_base64` and stores the bytes under its public bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_base64: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_uses_camel_case_admin_flag() {
        let resp = LoginResponse {
            success: true,
            token: Uuid::nil(),
            user: AuthUser {
                user_id: Uuid::nil(),
                email: "a@b.c".into(),
                user_name: None,
                phone: None,
                college: None,
                gender: None,
                dob: None,
            },
            is_admin: true,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["isAdmin"], serde_json::json!(true));
        assert!(json.get("is_admin").is_none());
    }

    #[test]
    fn reorder_request_round_trips() {
        let body = r#"{"orders":[{"id":3,"order":1},{"id":1,"order":2}]}"#;
        let req: ReorderRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.orders.len(), 2);
        assert_eq!(req.orders[0].id, 3);
        assert_eq!(req.orders[1].order, 2);
    }
}
