//! Registration reporting.
//!
//! One filtered query feeds the paginated rows; `total` and the
//! revenue summary come from aggregates over the same filter, so the
//! reported totals always describe the whole result set rather than
//! the returned page.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// One row of the admin registrations report.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegistrationReportRow {
    pub registration_id: i64,
    pub transaction_id: Option<String>,
    pub user_name: Option<String>,
    pub college: Option<String>,
    pub event_name: Option<String>,
    pub category: Option<String>,
    pub participation_type: Option<String>,
    pub payment_method: Option<String>,
    pub group_size: i64,
    pub payment_status: Option<String>,
    pub gross_amount: Decimal,
    pub gateway_charge: Decimal,
    pub net_amount: Decimal,
}

/// Revenue summary over the whole filtered set. Only rows whose
/// payment is done count toward revenue.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegistrationSummary {
    pub total_registrations: i64,
    pub paid: i64,
    pub gross_revenue: Decimal,
    pub gateway_charges: Decimal,
    pub net_revenue: Decimal,
}

/// Report filters. `search` matches user name, email, college and
/// transaction id together.
#[derive(Debug, Clone, Default)]
pub struct RegistrationFilter {
    pub search: Option<String>,
    pub event_name: Option<String>,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
}

const REPORT_SOURCE: &str = "FROM event_registrations r \
     LEFT JOIN users u ON u.user_id = r.user_id \
     LEFT JOIN event_fee ef ON ef.event_fee_id = r.event_fee_id \
     LEFT JOIN event e ON e.event_id = ef.event_id \
     LEFT JOIN event_category c ON c.category_id = e.category_id \
     LEFT JOIN fee f ON f.fee_id = ef.fee_id \
     LEFT JOIN payment_method pm ON pm.method_id = r.payment_method_id \
     LEFT JOIN (SELECT team_id, COUNT(*) AS member_count FROM team_members GROUP BY team_id) tm ON tm.team_id = r.team_id \
     WHERE ($1::text IS NULL OR u.user_name ILIKE $1 OR u.email ILIKE $1 OR u.college ILIKE $1 OR r.transaction_id ILIKE $1) \
       AND ($2::text IS NULL OR e.event_name = $2) \
       AND ($3::text IS NULL OR pm.method_name = $3) \
       AND ($4::text IS NULL OR r.payment_status = $4)";

#[derive(Clone, Debug)]
pub struct RegistrationService {
    pool: PgPool,
}

impl RegistrationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One page of the report plus the exact total and summary for the
    /// filter.
    pub async fn paged_report(
        &self,
        filter: &RegistrationFilter,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<RegistrationReportRow>, i64, RegistrationSummary)> {
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));

        let rows_sql = format!(
            "SELECT r.registration_id, r.transaction_id, u.user_name, u.college, \
                    e.event_name, c.category_name AS category, f.participation_type, \
                    pm.method_name AS payment_method, \
                    COALESCE(tm.member_count, 1) AS group_size, r.payment_status, \
                    COALESCE(r.gross_amount, 0) AS gross_amount, \
                    COALESCE(pm.gateway_charge, 0) AS gateway_charge, \
                    COALESCE(r.gross_amount, 0) - COALESCE(pm.gateway_charge, 0) AS net_amount \
             {REPORT_SOURCE} ORDER BY r.registration_id LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, RegistrationReportRow>(&rows_sql)
            .bind(&pattern)
            .bind(&filter.event_name)
            .bind(&filter.payment_method)
            .bind(&filter.payment_status)
            .bind(limit)
            .bind((page - 1) * limit)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch registrations page")?;

        let count_sql = format!("SELECT COUNT(*) {REPORT_SOURCE}");
        let (total,): (i64,) = sqlx::query_as(&count_sql)
            .bind(&pattern)
            .bind(&filter.event_name)
            .bind(&filter.payment_method)
            .bind(&filter.payment_status)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count registrations")?;

        let summary_sql = format!(
            "SELECT COUNT(*) AS total_registrations, \
                    COUNT(*) FILTER (WHERE r.payment_status = 'done') AS paid, \
                    COALESCE(SUM(COALESCE(r.gross_amount, 0)) FILTER (WHERE r.payment_status = 'done'), 0) AS gross_revenue, \
                    COALESCE(SUM(COALESCE(pm.gateway_charge, 0)) FILTER (WHERE r.payment_status = 'done'), 0) AS gateway_charges, \
                    COALESCE(SUM(COALESCE(r.gross_amount, 0) - COALESCE(pm.gateway_charge, 0)) FILTER (WHERE r.payment_status = 'done'), 0) AS net_revenue \
             {REPORT_SOURCE}"
        );
        let summary = sqlx::query_as::<_, RegistrationSummary>(&summary_sql)
            .bind(&pattern)
            .bind(&filter.event_name)
            .bind(&filter.payment_method)
            .bind(&filter.payment_status)
            .fetch_one(&self.pool)
            .await
            .context("Failed to summarize registrations")?;

        Ok((rows, total, summary))
    }
}
