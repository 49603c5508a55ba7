//! Admin authorization guard.
//!
//! Mutating admin routes take an [`AdminUser`] argument; extracting it
//! resolves the Bearer token against the session store and compares
//! the session email to the configured administrator address, so the
//! handler body never runs for an unauthorized caller.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::{is_admin, session_for_token, AuthSession};
use crate::error::ApiError;

use super::AppContext;

/// The authenticated administrator session.
pub struct AdminUser(pub AuthSession);

#[axum::async_trait]
impl FromRequestParts<AppContext> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let token = header
            .strip_prefix("Bearer ")
            .and_then(|t| Uuid::parse_str(t.trim()).ok())
            .ok_or(ApiError::Unauthorized)?;

        let session = session_for_token(&ctx.sessions, token)
            .await
            .ok_or(ApiError::Unauthorized)?;

        if !is_admin(&session, &ctx.config.admin_email) {
            return Err(ApiError::Forbidden);
        }

        Ok(AdminUser(session))
    }
}
