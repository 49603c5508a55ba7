//! REST routes for event category management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use festival_types::MessageResponse;
use serde::{Deserialize, Serialize};

use crate::database::{CategoryRow, CategoryService, CategoryUpdate, CategoryWithCount};
use crate::error::{ApiError, ApiResult};

use super::admin_guard::AdminUser;
use super::AppContext;

const NOT_FOUND: &str = "Category not found";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub category_name: Option<String>,
    pub description: Option<String>,
    pub category_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryWithCount>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub category: CategoryRow,
    pub message: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/admin/categories
async fn list_categories(State(ctx): State<AppContext>) -> ApiResult<Json<CategoryListResponse>> {
    let categories = CategoryService::new(ctx.pool.clone())
        .list_with_counts()
        .await?;
    let count = categories.len();
    Ok(Json(CategoryListResponse { categories, count }))
}

/// POST /api/admin/categories
async fn create_category(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryResponse>)> {
    let name = req
        .category_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::validation("Category name is required"))?;

    let category = CategoryService::new(ctx.pool.clone())
        .create(name, req.description.as_deref(), req.category_image.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            category,
            message: "Category created successfully".to_string(),
        }),
    ))
}

/// PUT /api/admin/categories/:id
async fn update_category(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<Json<CategoryResponse>> {
    if let Some(name) = &req.category_name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Category name cannot be empty"));
        }
    }

    let category = CategoryService::new(ctx.pool.clone())
        .update(
            id,
            &CategoryUpdate {
                category_name: req.category_name.clone(),
                description: req.description.clone(),
                category_image: req.category_image.clone(),
            },
        )
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    Ok(Json(CategoryResponse {
        category,
        message: "Category updated successfully".to_string(),
    }))
}

/// DELETE /api/admin/categories/:id
async fn delete_category(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = CategoryService::new(ctx.pool.clone()).delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound(NOT_FOUND));
    }
    Ok(Json(MessageResponse {
        message: "Category deleted successfully".to_string(),
    }))
}

pub fn create_category_router(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/api/admin/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/api/admin/categories/:id",
            axum::routing::put(update_category).delete(delete_category),
        )
        .with_state(ctx)
}
