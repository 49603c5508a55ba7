//! Accommodation packages - CRUD operations.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccommodationRow {
    pub id: i64,
    pub package_name: String,
    pub price: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct NewAccommodationFields {
    pub package_name: String,
    pub price: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub is_available: Option<bool>,
}

/// Fields to change; omitted fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct AccommodationUpdate {
    pub package_name: Option<String>,
    pub price: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct AccommodationService {
    pool: PgPool,
}

impl AccommodationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<AccommodationRow>> {
        sqlx::query_as::<_, AccommodationRow>(
            "SELECT id, package_name, price, start_date, end_date, description, is_available FROM accommodation_type ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list accommodation packages")
    }

    pub async fn get(&self, id: i64) -> Result<Option<AccommodationRow>> {
        sqlx::query_as::<_, AccommodationRow>(
            "SELECT id, package_name, price, start_date, end_date, description, is_available FROM accommodation_type WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get accommodation package")
    }

    pub async fn create(&self, fields: &NewAccommodationFields) -> Result<AccommodationRow> {
        let row = sqlx::query_as::<_, AccommodationRow>(
            "INSERT INTO accommodation_type (package_name, price, start_date, end_date, description, is_available) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, package_name, price, start_date, end_date, description, is_available",
        )
        .bind(&fields.package_name)
        .bind(fields.price)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(&fields.description)
        .bind(fields.is_available)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create accommodation package")?;
        info!(id = row.id, name = %row.package_name, "created accommodation package");
        Ok(row)
    }

    /// Returns the updated row, or None when the id does not exist.
    pub async fn update(
        &self,
        id: i64,
        update: &AccommodationUpdate,
    ) -> Result<Option<AccommodationRow>> {
        let row = sqlx::query_as::<_, AccommodationRow>(
            "UPDATE accommodation_type SET package_name = COALESCE($1, package_name), price = COALESCE($2, price), start_date = COALESCE($3, start_date), end_date = COALESCE($4, end_date), description = COALESCE($5, description), is_available = COALESCE($6, is_available) WHERE id = $7 RETURNING id, package_name, price, start_date, end_date, description, is_available",
        )
        .bind(&update.package_name)
        .bind(update.price)
        .bind(update.start_date)
        .bind(update.end_date)
        .bind(&update.description)
        .bind(update.is_available)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update accommodation package")?;
        if row.is_some() {
            info!(id, "updated accommodation package");
        }
        Ok(row)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM accommodation_type WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete accommodation package")?;
        if result.rows_affected() > 0 {
            info!(id, "deleted accommodation package");
        }
        Ok(result.rows_affected() > 0)
    }
}
