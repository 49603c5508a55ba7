//! REST routes for line-up artist management.
//!
//! Artist images arrive base64-encoded inside the JSON body and are
//! published through the image store.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use base64::Engine;
use festival_types::{ImageUpload, MessageResponse};
use serde::{Deserialize, Serialize};

use crate::database::{ArtistRow, ArtistService, ArtistWithConcert, NewArtistFields};
use crate::error::{ApiError, ApiResult};

use super::admin_guard::AdminUser;
use super::{validation, AppContext, IMAGE_BUCKET};

const NOT_FOUND: &str = "Artist not found";
const ARTIST_FOLDER: &str = "artists";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateArtistRequest {
    pub name: Option<String>,
    pub concert_id: Option<i64>,
    pub genre: Option<String>,
    /// "YYYY-MM-DD"
    pub reveal_date: Option<String>,
    pub bio: Option<String>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Serialize)]
pub struct ArtistListResponse {
    pub artists: Vec<ArtistWithConcert>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub artist: ArtistRow,
    pub message: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/admin/artists
async fn list_artists(State(ctx): State<AppContext>) -> ApiResult<Json<ArtistListResponse>> {
    let artists = ArtistService::new(ctx.pool.clone())
        .list_with_concerts()
        .await?;
    let count = artists.len();
    Ok(Json(ArtistListResponse { artists, count }))
}

/// POST /api/admin/artists
async fn create_artist(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Json(req): Json<CreateArtistRequest>,
) -> ApiResult<(StatusCode, Json<ArtistResponse>)> {
    let (Some(name), Some(concert_id), Some(reveal_date)) =
        (&req.name, req.concert_id, &req.reveal_date)
    else {
        return Err(ApiError::validation("Missing required fields"));
    };
    let reveal_date = validation::parse_iso_date(reveal_date, "reveal")?;

    let artist_image_url = match &req.image {
        Some(upload) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(&upload.content_base64)
                .map_err(|_| ApiError::validation("Invalid image encoding"))?;
            if bytes.is_empty() {
                return Err(ApiError::validation("Image file is empty"));
            }
            let stored = ctx
                .images
                .upload(IMAGE_BUCKET, ARTIST_FOLDER, &upload.file_name, &bytes)
                .await?;
            Some(stored.public_url)
        }
        None => None,
    };

    let artist = ArtistService::new(ctx.pool.clone())
        .create(&NewArtistFields {
            name: name.clone(),
            concert_id,
            genre: req.genre.clone(),
            reveal_date,
            bio: req.bio.clone(),
            artist_image_url,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ArtistResponse {
            artist,
            message: "Artist created successfully".to_string(),
        }),
    ))
}

/// DELETE /api/admin/artists/:id
async fn delete_artist(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let artist = ArtistService::new(ctx.pool.clone())
        .delete(id)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    if let Some(image_url) = &artist.artist_image_url {
        ctx.images.delete_public_url(IMAGE_BUCKET, image_url).await;
    }

    Ok(Json(MessageResponse {
        message: "Artist deleted successfully".to_string(),
    }))
}

pub fn create_artist_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/api/admin/artists", get(list_artists).post(create_artist))
        .route("/api/admin/artists/:id", axum::routing::delete(delete_artist))
        .with_state(ctx)
}
