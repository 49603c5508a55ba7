//! API error taxonomy.
//!
//! Every route handler returns [`ApiError`] on failure; the
//! `IntoResponse` impl maps the taxonomy onto HTTP statuses and a
//! `{ "error": string }` body.

use thiserror::Error;

/// Failure classes surfaced by the HTTP API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request rejected before any mutation (missing field, bad
    /// format, out-of-range value). Carries the user-facing message.
    #[error("{0}")]
    Validation(String),

    /// No session token, or the token does not resolve to a session.
    #[error("Unauthorized")]
    Unauthorized,

    /// Valid session, but not the configured administrator.
    #[error("Forbidden")]
    Forbidden,

    /// Referenced resource does not exist. Carries the full
    /// resource-specific message ("Sponsor not found", ...).
    #[error("{0}")]
    NotFound(&'static str),

    #[cfg(feature = "database")]
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(feature = "server")]
mod response {
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Json, Response};
    use festival_types::ErrorBody;

    use super::ApiError;

    impl ApiError {
        pub fn status(&self) -> StatusCode {
            match self {
                ApiError::Validation(_) => StatusCode::BAD_REQUEST,
                ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
                ApiError::Forbidden => StatusCode::FORBIDDEN,
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                ApiError::Database(_) | ApiError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let status = self.status();
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!(error = %self, "request failed");
            }
            let body = ErrorBody {
                error: self.to_string(),
            };
            (status, Json(body)).into_response()
        }
    }
}
