//! REST routes for merchandise: product catalog and orders.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use festival_types::MessageResponse;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::database::{
    MerchandiseService, NewProductFields, OrderRow, OrderUpdate, ProductRow, ProductUpdate,
};
use crate::error::{ApiError, ApiResult};

use super::admin_guard::AdminUser;
use super::{validation, AppContext, IMAGE_BUCKET};

const PRODUCT_NOT_FOUND: &str = "Product not found";
const ORDER_NOT_FOUND: &str = "Order not found";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub product_name: Option<String>,
    pub price: Option<Decimal>,
    pub available_sizes: Option<Vec<String>>,
    pub product_image: Option<String>,
    pub description: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductRow>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ProductEnvelope {
    pub product: ProductRow,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: ProductRow,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub items: Option<JsonValue>,
    pub amount: Option<Decimal>,
    pub order_date: Option<DateTime<Utc>>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderRow>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct OrderEnvelope {
    pub order: OrderRow,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: OrderRow,
    pub message: String,
}

// ============================================================================
// Product Handlers
// ============================================================================

/// GET /api/admin/merchandise/management
async fn list_products(State(ctx): State<AppContext>) -> ApiResult<Json<ProductListResponse>> {
    let products = MerchandiseService::new(ctx.pool.clone())
        .list_products()
        .await?;
    let count = products.len();
    Ok(Json(ProductListResponse { products, count }))
}

/// GET /api/admin/merchandise/management/:id
async fn get_product(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProductEnvelope>> {
    let product = MerchandiseService::new(ctx.pool.clone())
        .get_product(id)
        .await?
        .ok_or(ApiError::NotFound(PRODUCT_NOT_FOUND))?;
    Ok(Json(ProductEnvelope { product }))
}

/// POST /api/admin/merchandise/management
async fn create_product(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Json(req): Json<ProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let name = req
        .product_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::validation("Product name is required"))?;
    validation::validate_price(req.price)?;

    let product = MerchandiseService::new(ctx.pool.clone())
        .create_product(&NewProductFields {
            product_name: name.to_string(),
            price: req.price,
            available_sizes: req.available_sizes.clone(),
            product_image: req.product_image.clone(),
            description: req.description.clone(),
            is_available: req.is_available,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            product,
            message: "Product created successfully".to_string(),
        }),
    ))
}

/// PUT /api/admin/merchandise/management/:id
async fn update_product(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<ProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    if let Some(name) = &req.product_name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Product name cannot be empty"));
        }
    }
    validation::validate_price(req.price)?;

    let product = MerchandiseService::new(ctx.pool.clone())
        .update_product(
            id,
            &ProductUpdate {
                product_name: req.product_name.clone(),
                price: req.price,
                available_sizes: req.available_sizes.clone(),
                product_image: req.product_image.clone(),
                description: req.description.clone(),
                is_available: req.is_available,
            },
        )
        .await?
        .ok_or(ApiError::NotFound(PRODUCT_NOT_FOUND))?;
    Ok(Json(ProductResponse {
        product,
        message: "Product updated successfully".to_string(),
    }))
}

/// DELETE /api/admin/merchandise/management/:id
async fn delete_product(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let product = MerchandiseService::new(ctx.pool.clone())
        .delete_product(id)
        .await?
        .ok_or(ApiError::NotFound(PRODUCT_NOT_FOUND))?;

    if let Some(image_url) = &product.product_image {
        ctx.images.delete_public_url(IMAGE_BUCKET, image_url).await;
    }

    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}

// ============================================================================
// Order Handlers
// ============================================================================

/// GET /api/admin/merchandise/orders
async fn list_orders(State(ctx): State<AppContext>) -> ApiResult<Json<OrderListResponse>> {
    let orders = MerchandiseService::new(ctx.pool.clone())
        .list_orders()
        .await?;
    let count = orders.len();
    Ok(Json(OrderListResponse { orders, count }))
}

/// GET /api/admin/merchandise/orders/:id
async fn get_order(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<OrderEnvelope>> {
    let order = MerchandiseService::new(ctx.pool.clone())
        .get_order(id)
        .await?
        .ok_or(ApiError::NotFound(ORDER_NOT_FOUND))?;
    Ok(Json(OrderEnvelope { order }))
}

/// PUT /api/admin/merchandise/orders/:id
async fn update_order(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<OrderRequest>,
) -> ApiResult<Json<OrderResponse>> {
    validation::validate_price(req.amount)?;

    let order = MerchandiseService::new(ctx.pool.clone())
        .update_order(
            id,
            &OrderUpdate {
                items: req.items.clone(),
                amount: req.amount,
                order_date: req.order_date,
                payment_status: req.payment_status.clone(),
                payment_method: req.payment_method.clone(),
            },
        )
        .await?
        .ok_or(ApiError::NotFound(ORDER_NOT_FOUND))?;
    Ok(Json(OrderResponse {
        order,
        message: "Order updated successfully".to_string(),
    }))
}

/// DELETE /api/admin/merchandise/orders/:id
async fn delete_order(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = MerchandiseService::new(ctx.pool.clone())
        .delete_order(id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound(ORDER_NOT_FOUND));
    }
    Ok(Json(MessageResponse {
        message: "Order deleted successfully".to_string(),
    }))
}

pub fn create_merchandise_router(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/api/admin/merchandise/management",
            get(list_products).post(create_product),
        )
        .route(
            "/api/admin/merchandise/management/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/admin/merchandise/orders", get(list_orders))
        .route(
            "/api/admin/merchandise/orders/:id",
            get(get_order).put(update_order).delete(delete_order),
        )
        .with_state(ctx)
}
