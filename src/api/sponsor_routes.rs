//! REST routes for sponsor management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, patch};
use axum::Router;
use festival_types::{MessageResponse, ReorderRequest};
use serde::{Deserialize, Serialize};

use crate::database::{NewSponsorFields, SponsorRow, SponsorService, SponsorUpdate};
use crate::error::{ApiError, ApiResult};

use super::admin_guard::AdminUser;
use super::{AppContext, IMAGE_BUCKET};

const NOT_FOUND: &str = "Sponsor not found";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SponsorRequest {
    pub name: Option<String>,
    pub tier: Option<String>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SponsorListResponse {
    pub sponsors: Vec<SponsorRow>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct SponsorEnvelope {
    pub sponsor: SponsorRow,
}

#[derive(Debug, Serialize)]
pub struct SponsorResponse {
    pub sponsor: SponsorRow,
    pub message: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/admin/sponsors
async fn list_sponsors(State(ctx): State<AppContext>) -> ApiResult<Json<SponsorListResponse>> {
    let sponsors = SponsorService::new(ctx.pool.clone()).list().await?;
    let count = sponsors.len();
    Ok(Json(SponsorListResponse { sponsors, count }))
}

/// GET /api/admin/sponsors/:id
async fn get_sponsor(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SponsorEnvelope>> {
    let sponsor = SponsorService::new(ctx.pool.clone())
        .get(id)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    Ok(Json(SponsorEnvelope { sponsor }))
}

/// POST /api/admin/sponsors
async fn create_sponsor(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Json(req): Json<SponsorRequest>,
) -> ApiResult<(StatusCode, Json<SponsorResponse>)> {
    let (name, tier) = match (&req.name, &req.tier) {
        (Some(name), Some(tier)) => (name.clone(), tier.clone()),
        _ => {
            return Err(ApiError::validation("Name and tier are required fields"));
        }
    };
    if tier.trim().is_empty() {
        return Err(ApiError::validation("Tier cannot be empty"));
    }

    let sponsor = SponsorService::new(ctx.pool.clone())
        .create(&NewSponsorFields {
            name,
            tier,
            website_url: req.website_url.clone(),
            logo_url: req.logo_url.clone(),
            description: req.description.clone(),
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SponsorResponse {
            sponsor,
            message: "Sponsor created successfully".to_string(),
        }),
    ))
}

/// PUT /api/admin/sponsors/:id
async fn update_sponsor(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<SponsorRequest>,
) -> ApiResult<Json<SponsorResponse>> {
    if let Some(tier) = &req.tier {
        if tier.trim().is_empty() {
            return Err(ApiError::validation("Tier cannot be empty"));
        }
    }

    let sponsor = SponsorService::new(ctx.pool.clone())
        .update(
            id,
            &SponsorUpdate {
                name: req.name.clone(),
                tier: req.tier.clone(),
                website_url: req.website_url.clone(),
                logo_url: req.logo_url.clone(),
                description: req.description.clone(),
            },
        )
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    Ok(Json(SponsorResponse {
        sponsor,
        message: "Sponsor updated successfully".to_string(),
    }))
}

/// DELETE /api/admin/sponsors/:id
async fn delete_sponsor(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let sponsor = SponsorService::new(ctx.pool.clone())
        .delete(id)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    if let Some(logo_url) = &sponsor.logo_url {
        ctx.images.delete_public_url(IMAGE_BUCKET, logo_url).await;
    }

    Ok(Json(MessageResponse {
        message: "Sponsor deleted successfully".to_string(),
    }))
}

/// PATCH /api/admin/sponsors/reorder
async fn reorder_sponsors(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Json(req): Json<ReorderRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if req.orders.is_empty() {
        return Err(ApiError::validation("At least one order entry is required"));
    }

    let orders: Vec<(i64, i32)> = req.orders.iter().map(|o| (o.id, o.order)).collect();
    let updated = SponsorService::new(ctx.pool.clone())
        .reorder(&orders)
        .await?;
    Ok(Json(MessageResponse {
        message: format!("Updated display order for {updated} sponsors"),
    }))
}

pub fn create_sponsor_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/api/admin/sponsors", get(list_sponsors).post(create_sponsor))
        .route("/api/admin/sponsors/reorder", patch(reorder_sponsors))
        .route(
            "/api/admin/sponsors/:id",
            get(get_sponsor).put(update_sponsor).delete(delete_sponsor),
        )
        .with_state(ctx)
}
