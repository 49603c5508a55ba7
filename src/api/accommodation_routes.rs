//! REST routes for accommodation package management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use festival_types::MessageResponse;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::database::{
    AccommodationRow, AccommodationService, AccommodationUpdate, NewAccommodationFields,
};
use crate::error::{ApiError, ApiResult};

use super::admin_guard::AdminUser;
use super::{validation, AppContext};

const NOT_FOUND: &str = "Accommodation package not found";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PackageRequest {
    pub package_name: Option<String>,
    pub price: Option<Decimal>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct PackageListResponse {
    pub packages: Vec<AccommodationRow>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct PackageEnvelope {
    pub package: AccommodationRow,
}

#[derive(Debug, Serialize)]
pub struct PackageResponse {
    pub package: AccommodationRow,
    pub message: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/admin/accommodation
async fn list_packages(State(ctx): State<AppContext>) -> ApiResult<Json<PackageListResponse>> {
    let packages = AccommodationService::new(ctx.pool.clone()).list().await?;
    let count = packages.len();
    Ok(Json(PackageListResponse { packages, count }))
}

/// GET /api/admin/accommodation/:id
async fn get_package(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PackageEnvelope>> {
    let package = AccommodationService::new(ctx.pool.clone())
        .get(id)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    Ok(Json(PackageEnvelope { package }))
}

/// POST /api/admin/accommodation
async fn create_package(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Json(req): Json<PackageRequest>,
) -> ApiResult<(StatusCode, Json<PackageResponse>)> {
    let fields = validate_new_package(&req)?;
    let package = AccommodationService::new(ctx.pool.clone())
        .create(&fields)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PackageResponse {
            package,
            message: "Accommodation package created successfully".to_string(),
        }),
    ))
}

/// PUT /api/admin/accommodation/:id
async fn update_package(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<PackageRequest>,
) -> ApiResult<Json<PackageResponse>> {
    let update = validate_package_update(&req)?;
    let package = AccommodationService::new(ctx.pool.clone())
        .update(id, &update)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    Ok(Json(PackageResponse {
        package,
        message: "Accommodation package updated successfully".to_string(),
    }))
}

/// DELETE /api/admin/accommodation/:id
async fn delete_package(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = AccommodationService::new(ctx.pool.clone()).delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound(NOT_FOUND));
    }
    Ok(Json(MessageResponse {
        message: "Accommodation package deleted successfully".to_string(),
    }))
}

// ============================================================================
// Validation
// ============================================================================

fn validate_new_package(req: &PackageRequest) -> Result<NewAccommodationFields, ApiError> {
    let name = req
        .package_name
        .as_deref()
        .ok_or_else(|| ApiError::validation("Package name is required"))?;
    if name.trim().is_empty() {
        return Err(ApiError::validation("Package name cannot be empty"));
    }

    validation::validate_price(req.price)?;
    let start_date = req
        .start_date
        .as_deref()
        .map(|d| validation::parse_iso_date(d, "start"))
        .transpose()?;
    let end_date = req
        .end_date
        .as_deref()
        .map(|d| validation::parse_iso_date(d, "end"))
        .transpose()?;
    validation::validate_date_range(start_date, end_date)?;

    Ok(NewAccommodationFields {
        package_name: name.to_string(),
        price: req.price,
        start_date,
        end_date,
        description: req.description.clone(),
        is_available: req.is_available,
    })
}

fn validate_package_update(req: &PackageRequest) -> Result<AccommodationUpdate, ApiError> {
    if let Some(name) = &req.package_name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Package name cannot be empty"));
        }
    }

    validation::validate_price(req.price)?;
    let start_date = req
        .start_date
        .as_deref()
        .map(|d| validation::parse_iso_date(d, "start"))
        .transpose()?;
    let end_date = req
        .end_date
        .as_deref()
        .map(|d| validation::parse_iso_date(d, "end"))
        .transpose()?;
    validation::validate_date_range(start_date, end_date)?;

    Ok(AccommodationUpdate {
        package_name: req.package_name.clone(),
        price: req.price,
        start_date,
        end_date,
        description: req.description.clone(),
        is_available: req.is_available,
    })
}

pub fn create_accommodation_router(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/api/admin/accommodation",
            get(list_packages).post(create_package),
        )
        .route(
            "/api/admin/accommodation/:id",
            get(get_package).put(update_package).delete(delete_package),
        )
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> PackageRequest {
        PackageRequest {
            package_name: Some("Deluxe".to_string()),
            price: None,
            start_date: None,
            end_date: None,
            description: None,
            is_available: None,
        }
    }

    #[test]
    fn name_is_required_and_non_empty() {
        let mut req = base_request();
        req.package_name = None;
        assert_eq!(
            validate_new_package(&req).unwrap_err().to_string(),
            "Package name is required"
        );

        req.package_name = Some("   ".to_string());
        assert_eq!(
            validate_new_package(&req).unwrap_err().to_string(),
            "Package name cannot be empty"
        );
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut req = base_request();
        req.price = Some(Decimal::from(-5));
        assert_eq!(
            validate_new_package(&req).unwrap_err().to_string(),
            "Price must be a positive number"
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut req = base_request();
        req.price = Some(Decimal::from(100));
        req.start_date = Some("2025-12-25".to_string());
        req.end_date = Some("2025-12-20".to_string());
        assert_eq!(
            validate_new_package(&req).unwrap_err().to_string(),
            "End date must be after start date"
        );
    }

    #[test]
    fn valid_request_passes() {
        let mut req = base_request();
        req.price = Some(Decimal::from(100));
        req.start_date = Some("2025-12-20".to_string());
        req.end_date = Some("2025-12-25".to_string());

        let fields = validate_new_package(&req).unwrap();
        assert_eq!(fields.package_name, "Deluxe");
        assert_eq!(fields.price, Some(Decimal::from(100)));
        assert!(fields.start_date.unwrap() < fields.end_date.unwrap());
    }

    #[test]
    fn update_accepts_partial_bodies() {
        let req = PackageRequest {
            package_name: None,
            price: Some(Decimal::from(250)),
            start_date: None,
            end_date: None,
            description: None,
            is_available: Some(false),
        };
        let update = validate_package_update(&req).unwrap();
        assert!(update.package_name.is_none());
        assert_eq!(update.price, Some(Decimal::from(250)));
        assert_eq!(update.is_available, Some(false));
    }
}
