//! REST routes for event management.
//!
//! Events carry an optional fee set; the create and update handlers
//! pass it down to the service layer, which swaps fees atomically.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use festival_types::MessageResponse;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::database::{
    EventRow, EventService, EventUpdate, EventWithDetails, NewEventFields, NewFeeFields,
};
use crate::error::{ApiError, ApiResult};

use super::admin_guard::AdminUser;
use super::AppContext;

const NOT_FOUND: &str = "Event not found";

// ============================================================================
// Request/Response Types
// ============================================================================

/// A fee entry as submitted by the admin form.
#[derive(Debug, Deserialize)]
pub struct FeePayload {
    #[serde(rename = "type")]
    pub participation_type: String,
    pub price: Decimal,
    pub min: Option<i32>,
    pub max: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub event_name: Option<String>,
    pub category_id: Option<i64>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_picture: Option<String>,
    pub rulebook: Option<String>,
    pub description: Option<String>,
    pub is_registration_open: Option<bool>,
    pub is_dau_free: Option<bool>,
    pub fees: Option<Vec<FeePayload>>,
}

#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<EventWithDetails>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct EventEnvelope {
    pub event: EventRow,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub event: EventRow,
    pub message: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/admin/events
async fn list_events(State(ctx): State<AppContext>) -> ApiResult<Json<EventListResponse>> {
    let events = EventService::new(ctx.pool.clone())
        .list_with_details()
        .await?;
    let count = events.len();
    Ok(Json(EventListResponse { events, count }))
}

/// GET /api/admin/events/:id
async fn get_event(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EventEnvelope>> {
    let event = EventService::new(ctx.pool.clone())
        .get(id)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    Ok(Json(EventEnvelope { event }))
}

/// POST /api/admin/events
async fn create_event(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Json(req): Json<EventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let name = req
        .event_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::validation("Event name is required"))?;
    let category_id = req
        .category_id
        .ok_or_else(|| ApiError::validation("Category is required"))?;
    let fees = validate_fees(req.fees.as_deref())?;

    let event = EventService::new(ctx.pool.clone())
        .create(
            &NewEventFields {
                event_name: name.to_string(),
                category_id,
                event_date: req.event_date,
                event_picture: req.event_picture.clone(),
                rulebook: req.rulebook.clone(),
                description: req.description.clone(),
                is_registration_open: req.is_registration_open.unwrap_or(true),
                is_dau_free: req.is_dau_free.unwrap_or(false),
            },
            &fees,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            event,
            message: "Event created successfully".to_string(),
        }),
    ))
}

/// PUT /api/admin/events/:id
async fn update_event(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<EventRequest>,
) -> ApiResult<Json<EventResponse>> {
    if let Some(name) = &req.event_name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Event name cannot be empty"));
        }
    }
    let fees = req
        .fees
        .as_deref()
        .map(|f| validate_fees(Some(f)))
        .transpose()?;

    let event = EventService::new(ctx.pool.clone())
        .update(
            id,
            &EventUpdate {
                event_name: req.event_name.clone(),
                category_id: req.category_id,
                event_date: req.event_date,
                event_picture: req.event_picture.clone(),
                rulebook: req.rulebook.clone(),
                description: req.description.clone(),
                is_registration_open: req.is_registration_open,
                is_dau_free: req.is_dau_free,
            },
            fees.as_deref(),
        )
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    Ok(Json(EventResponse {
        event,
        message: "Event updated successfully".to_string(),
    }))
}

/// DELETE /api/admin/events/:id
async fn delete_event(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = EventService::new(ctx.pool.clone()).delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound(NOT_FOUND));
    }
    Ok(Json(MessageResponse {
        message: "Event deleted successfully".to_string(),
    }))
}

// ============================================================================
// Validation
// ============================================================================

fn validate_fees(fees: Option<&[FeePayload]>) -> Result<Vec<NewFeeFields>, ApiError> {
    let Some(fees) = fees else {
        return Ok(Vec::new());
    };

    fees.iter()
        .map(|fee| {
            if fee.participation_type.trim().is_empty() {
                return Err(ApiError::validation("Fee type cannot be empty"));
            }
            if fee.price < Decimal::ZERO {
                return Err(ApiError::validation("Price must be a positive number"));
            }
            let min_members = fee.min.unwrap_or(1);
            let max_members = fee.max.unwrap_or(1);
            if min_members < 1 {
                return Err(ApiError::validation("Minimum members must be at least 1"));
            }
            if max_members < min_members {
                return Err(ApiError::validation(
                    "Maximum members cannot be less than minimum members",
                ));
            }
            Ok(NewFeeFields {
                participation_type: fee.participation_type.clone(),
                price: fee.price,
                min_members,
                max_members,
            })
        })
        .collect()
}

pub fn create_event_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/api/admin/events", get(list_events).post(create_event))
        .route(
            "/api/admin/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee(price: i64, min: Option<i32>, max: Option<i32>) -> FeePayload {
        FeePayload {
            participation_type: "solo".to_string(),
            price: Decimal::from(price),
            min,
            max,
        }
    }

    #[test]
    fn missing_fees_mean_empty_set() {
        assert!(validate_fees(None).unwrap().is_empty());
    }

    #[test]
    fn member_bounds_default_to_one() {
        let fees = validate_fees(Some(&[fee(100, None, None)])).unwrap();
        assert_eq!(fees[0].min_members, 1);
        assert_eq!(fees[0].max_members, 1);
    }

    #[test]
    fn inverted_member_bounds_are_rejected() {
        let err = validate_fees(Some(&[fee(100, Some(4), Some(2))])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Maximum members cannot be less than minimum members"
        );
    }

    #[test]
    fn negative_fee_price_is_rejected() {
        let err = validate_fees(Some(&[fee(-1, None, None)])).unwrap_err();
        assert_eq!(err.to_string(), "Price must be a positive number");
    }
}
