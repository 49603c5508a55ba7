//! Sponsors - CRUD and display ordering.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SponsorRow {
    pub sponsor_id: i64,
    pub name: String,
    pub tier: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSponsorFields {
    pub name: String,
    pub tier: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
}

/// Fields to change; omitted fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct SponsorUpdate {
    pub name: Option<String>,
    pub tier: Option<String>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
}

const SPONSOR_COLUMNS: &str =
    "sponsor_id, name, tier, website_url, logo_url, description, display_order";

#[derive(Clone, Debug)]
pub struct SponsorService {
    pool: PgPool,
}

impl SponsorService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<SponsorRow>> {
        sqlx::query_as::<_, SponsorRow>(&format!(
            "SELECT {SPONSOR_COLUMNS} FROM sponsors ORDER BY display_order NULLS LAST, sponsor_id"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list sponsors")
    }

    pub async fn get(&self, sponsor_id: i64) -> Result<Option<SponsorRow>> {
        sqlx::query_as::<_, SponsorRow>(&format!(
            "SELECT {SPONSOR_COLUMNS} FROM sponsors WHERE sponsor_id = $1"
        ))
        .bind(sponsor_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get sponsor")
    }

    pub async fn create(&self, fields: &NewSponsorFields) -> Result<SponsorRow> {
        let row = sqlx::query_as::<_, SponsorRow>(&format!(
            "INSERT INTO sponsors (name, tier, website_url, logo_url, description) VALUES ($1, $2, $3, $4, $5) RETURNING {SPONSOR_COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(&fields.tier)
        .bind(&fields.website_url)
        .bind(&fields.logo_url)
        .bind(&fields.description)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create sponsor")?;
        info!(sponsor_id = row.sponsor_id, name = %row.name, "created sponsor");
        Ok(row)
    }

    /// Returns the updated row, or None when the id does not exist.
    pub async fn update(
        &self,
        sponsor_id: i64,
        update: &SponsorUpdate,
    ) -> Result<Option<SponsorRow>> {
        let row = sqlx::query_as::<_, SponsorRow>(&format!(
            "UPDATE sponsors SET name = COALESCE($1, name), tier = COALESCE($2, tier), website_url = COALESCE($3, website_url), logo_url = COALESCE($4, logo_url), description = COALESCE($5, description) WHERE sponsor_id = $6 RETURNING {SPONSOR_COLUMNS}"
        ))
        .bind(&update.name)
        .bind(&update.tier)
        .bind(&update.website_url)
        .bind(&update.logo_url)
        .bind(&update.description)
        .bind(sponsor_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update sponsor")?;
        if row.is_some() {
            info!(sponsor_id, "updated sponsor");
        }
        Ok(row)
    }

    /// Returns the deleted row (for logo cleanup), or None when the id
    /// does not exist.
    pub async fn delete(&self, sponsor_id: i64) -> Result<Option<SponsorRow>> {
        let row = sqlx::query_as::<_, SponsorRow>(&format!(
            "DELETE FROM sponsors WHERE sponsor_id = $1 RETURNING {SPONSOR_COLUMNS}"
        ))
        .bind(sponsor_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to delete sponsor")?;
        if row.is_some() {
            info!(sponsor_id, "deleted sponsor");
        }
        Ok(row)
    }

    /// Apply display-order positions in one transaction. Returns how
    /// many rows actually changed.
    pub async fn reorder(&self, orders: &[(i64, i32)]) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin reorder transaction")?;
        let mut updated = 0;
        for (sponsor_id, order) in orders {
            let result = sqlx::query("UPDATE sponsors SET display_order = $1 WHERE sponsor_id = $2")
                .bind(order)
                .bind(sponsor_id)
                .execute(&mut *tx)
                .await
                .context("Failed to update sponsor display order")?;
            updated += result.rows_affected();
        }
        tx.commit()
            .await
            .context("Failed to commit reorder transaction")?;
        info!(updated, "reordered sponsors");
        Ok(updated)
    }
}
