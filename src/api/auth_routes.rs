//! Public auth routes: register, login, logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use festival_types::{
    AuthUser, LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse,
};
use uuid::Uuid;

use crate::auth::{generate_salt, hash_password, insert_session, remove_session, verify_password};
use crate::database::{NewUserFields, UserRow, UserService};
use crate::error::{ApiError, ApiResult};

use super::{validation, AppContext};

fn public_user(row: &UserRow) -> AuthUser {
    AuthUser {
        user_id: row.user_id,
        email: row.email.clone(),
        user_name: row.user_name.clone(),
        phone: row.phone.clone(),
        college: row.college.clone(),
        gender: row.gender.clone(),
        dob: row.dob,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/auth/register
async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let (Some(email), Some(password), Some(first_name), Some(last_name)) =
        (&req.email, &req.password, &req.first_name, &req.last_name)
    else {
        return Err(ApiError::validation("Missing required fields"));
    };

    let user_name = format!("{first_name} {last_name}").trim().to_string();
    let dob = req
        .dob
        .as_deref()
        .map(|d| validation::parse_iso_date(d, "birth"))
        .transpose()?;

    let service = UserService::new(ctx.pool.clone());
    if service.get_by_email(email).await?.is_some() {
        return Err(ApiError::validation("User already registered"));
    }

    let salt = generate_salt();
    let fields = NewUserFields {
        email: email.clone(),
        user_name: Some(user_name),
        phone: req.phone.clone(),
        college: req.college.clone(),
        gender: req.gender.clone(),
        dob,
        password_hash: hash_password(password, &salt),
        password_salt: salt,
    };
    service.create(&fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "Registration successful".to_string(),
        }),
    ))
}

/// POST /api/auth/login
async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (Some(email), Some(password)) = (&req.email, &req.password) else {
        return Err(ApiError::validation("Email and password are required"));
    };

    let user = UserService::new(ctx.pool.clone())
        .get_by_email(email)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    if !verify_password(password, &user.password_salt, &user.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    let token = insert_session(&ctx.sessions, user.user_id, user.email.clone()).await;
    let is_admin =
        !ctx.config.admin_email.is_empty() && user.email == ctx.config.admin_email;

    Ok(Json(LoginResponse {
        success: true,
        token,
        user: public_user(&user),
        is_admin,
    }))
}

/// POST /api/auth/logout
async fn logout(
    State(ctx): State<AppContext>,
    headers: axum::http::HeaderMap,
) -> ApiResult<Json<MessageResponse>> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(|t| Uuid::parse_str(t.trim()).ok())
        .ok_or(ApiError::Unauthorized)?;

    if !remove_session(&ctx.sessions, token).await {
        return Err(ApiError::Unauthorized);
    }
    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

pub fn create_auth_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .with_state(ctx)
}
