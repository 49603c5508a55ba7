//! Registration report route.

use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::database::{
    RegistrationFilter, RegistrationReportRow, RegistrationService, RegistrationSummary,
};
use crate::error::ApiResult;

use super::AppContext;

const MAX_PAGE_SIZE: i64 = 100;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matches user name, email, college and transaction id.
    #[serde(rename = "searchParams")]
    pub search: Option<String>,
    /// Event name filter.
    pub filter: Option<String>,
    #[serde(rename = "paymentMethod")]
    pub payment_method: Option<String>,
    #[serde(rename = "paymentStatus")]
    pub payment_status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub summary: RegistrationSummary,
    pub data: Vec<RegistrationReportRow>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/admin/registrations
async fn get_report(
    State(ctx): State<AppContext>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<ReportResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, MAX_PAGE_SIZE);

    let filter = RegistrationFilter {
        search: query.search,
        event_name: query.filter,
        payment_method: query.payment_method,
        payment_status: query.payment_status,
    };
    let (data, total, summary) = RegistrationService::new(ctx.pool.clone())
        .paged_report(&filter, page, limit)
        .await?;

    Ok(Json(ReportResponse {
        page,
        limit,
        total,
        summary,
        data,
    }))
}

pub fn create_registration_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/api/admin/registrations", get(get_report))
        .with_state(ctx)
}
