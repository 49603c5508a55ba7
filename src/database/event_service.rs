//! Events and their fee structures.
//!
//! Fee rows are owned by their event: creating an event inserts its
//! fees and the link rows in the same transaction, and replacing the
//! fee set swaps all of them atomically so a mid-operation failure
//! can never leave an event half-priced.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRow {
    pub event_id: i64,
    pub event_name: String,
    pub category_id: Option<i64>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_picture: Option<String>,
    pub rulebook: Option<String>,
    pub description: Option<String>,
    pub is_registration_open: Option<bool>,
    pub is_dau_free: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeeRow {
    pub fee_id: i64,
    pub participation_type: String,
    pub price: Decimal,
    pub min_members: i32,
    pub max_members: i32,
}

/// An event with its category name and fee rows, as listed by the
/// admin back-office.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWithDetails {
    #[serde(flatten)]
    pub event: EventRow,
    pub category_name: Option<String>,
    pub fees: Vec<FeeRow>,
}

#[derive(Debug, Clone)]
pub struct NewEventFields {
    pub event_name: String,
    pub category_id: i64,
    pub event_date: Option<DateTime<Utc>>,
    pub event_picture: Option<String>,
    pub rulebook: Option<String>,
    pub description: Option<String>,
    pub is_registration_open: bool,
    pub is_dau_free: bool,
}

#[derive(Debug, Clone)]
pub struct NewFeeFields {
    pub participation_type: String,
    pub price: Decimal,
    pub min_members: i32,
    pub max_members: i32,
}

/// Fields to change; omitted fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub event_name: Option<String>,
    pub category_id: Option<i64>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_picture: Option<String>,
    pub rulebook: Option<String>,
    pub description: Option<String>,
    pub is_registration_open: Option<bool>,
    pub is_dau_free: Option<bool>,
}

const EVENT_COLUMNS: &str = "event_id, event_name, category_id, event_date, event_picture, rulebook, description, is_registration_open, is_dau_free";

#[derive(Debug, Clone, FromRow)]
struct EventFeeJoinRow {
    event_id: i64,
    #[sqlx(flatten)]
    fee: FeeRow,
}

#[derive(Clone, Debug)]
pub struct EventService {
    pool: PgPool,
}

impl EventService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All events ordered by date, each with its category name and
    /// fee rows.
    pub async fn list_with_details(&self) -> Result<Vec<EventWithDetails>> {
        let events = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM event ORDER BY event_date"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list events")?;

        let names: Vec<(i64, String)> = sqlx::query_as(
            "SELECT e.event_id, c.category_name FROM event e JOIN event_category c ON c.category_id = e.category_id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch event categories")?;
        let names: HashMap<i64, String> = names.into_iter().collect();

        let fee_rows = sqlx::query_as::<_, EventFeeJoinRow>(
            "SELECT ef.event_id, f.fee_id, f.participation_type, f.price, f.min_members, f.max_members FROM event_fee ef JOIN fee f ON f.fee_id = ef.fee_id ORDER BY f.fee_id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch event fees")?;

        let mut fees_by_event: HashMap<i64, Vec<FeeRow>> = HashMap::new();
        for row in fee_rows {
            fees_by_event.entry(row.event_id).or_default().push(row.fee);
        }

        Ok(events
            .into_iter()
            .map(|event| EventWithDetails {
                category_name: names.get(&event.event_id).cloned(),
                fees: fees_by_event.remove(&event.event_id).unwrap_or_default(),
                event,
            })
            .collect())
    }

    pub async fn get(&self, event_id: i64) -> Result<Option<EventRow>> {
        sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM event WHERE event_id = $1"
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get event")
    }

    /// Create the event and its fee rows in one transaction.
    pub async fn create(&self, fields: &NewEventFields, fees: &[NewFeeFields]) -> Result<EventRow> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin event transaction")?;

        let event = sqlx::query_as::<_, EventRow>(&format!(
            "INSERT INTO event (event_name, category_id, event_date, event_picture, rulebook, description, is_registration_open, is_dau_free) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {EVENT_COLUMNS}"
        ))
        .bind(&fields.event_name)
        .bind(fields.category_id)
        .bind(fields.event_date)
        .bind(&fields.event_picture)
        .bind(&fields.rulebook)
        .bind(&fields.description)
        .bind(fields.is_registration_open)
        .bind(fields.is_dau_free)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to create event")?;

        Self::insert_fees(&mut tx, event.event_id, fees).await?;

        tx.commit()
            .await
            .context("Failed to commit event transaction")?;
        info!(event_id = event.event_id, name = %event.event_name, fees = fees.len(), "created event");
        Ok(event)
    }

    /// Partial update, with an optional full replacement of the fee
    /// set. Everything runs in one transaction. Returns None when the
    /// event does not exist.
    pub async fn update(
        &self,
        event_id: i64,
        update: &EventUpdate,
        fees: Option<&[NewFeeFields]>,
    ) -> Result<Option<EventRow>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin event transaction")?;

        let Some(event) = sqlx::query_as::<_, EventRow>(&format!(
            "UPDATE event SET event_name = COALESCE($1, event_name), category_id = COALESCE($2, category_id), event_date = COALESCE($3, event_date), event_picture = COALESCE($4, event_picture), rulebook = COALESCE($5, rulebook), description = COALESCE($6, description), is_registration_open = COALESCE($7, is_registration_open), is_dau_free = COALESCE($8, is_dau_free) WHERE event_id = $9 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(&update.event_name)
        .bind(update.category_id)
        .bind(update.event_date)
        .bind(&update.event_picture)
        .bind(&update.rulebook)
        .bind(&update.description)
        .bind(update.is_registration_open)
        .bind(update.is_dau_free)
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to update event")?
        else {
            return Ok(None);
        };

        if let Some(fees) = fees {
            Self::delete_fees(&mut tx, event_id).await?;
            Self::insert_fees(&mut tx, event_id, fees).await?;
            info!(event_id, fees = fees.len(), "replaced event fees");
        }

        tx.commit()
            .await
            .context("Failed to commit event transaction")?;
        info!(event_id, "updated event");
        Ok(Some(event))
    }

    /// Delete the event together with its fee rows and links.
    pub async fn delete(&self, event_id: i64) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin event transaction")?;

        Self::delete_fees(&mut tx, event_id).await?;

        let result = sqlx::query("DELETE FROM event WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete event")?;

        tx.commit()
            .await
            .context("Failed to commit event transaction")?;
        if result.rows_affected() > 0 {
            info!(event_id, "deleted event");
        }
        Ok(result.rows_affected() > 0)
    }

    /// Fee rows currently linked to an event.
    pub async fn fees_for_event(&self, event_id: i64) -> Result<Vec<FeeRow>> {
        sqlx::query_as::<_, FeeRow>(
            "SELECT f.fee_id, f.participation_type, f.price, f.min_members, f.max_members FROM event_fee ef JOIN fee f ON f.fee_id = ef.fee_id WHERE ef.event_id = $1 ORDER BY f.fee_id",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch event fees")
    }

    async fn insert_fees(
        tx: &mut Transaction<'_, Postgres>,
        event_id: i64,
        fees: &[NewFeeFields],
    ) -> Result<()> {
        for fee in fees {
            let (fee_id,): (i64,) = sqlx::query_as(
                "INSERT INTO fee (participation_type, price, min_members, max_members) VALUES ($1, $2, $3, $4) RETURNING fee_id",
            )
            .bind(&fee.participation_type)
            .bind(fee.price)
            .bind(fee.min_members)
            .bind(fee.max_members)
            .fetch_one(&mut **tx)
            .await
            .context("Failed to create fee")?;

            sqlx::query("INSERT INTO event_fee (event_id, fee_id) VALUES ($1, $2)")
                .bind(event_id)
                .bind(fee_id)
                .execute(&mut **tx)
                .await
                .context("Failed to link fee to event")?;
        }
        Ok(())
    }

    async fn delete_fees(tx: &mut Transaction<'_, Postgres>, event_id: i64) -> Result<()> {
        let fee_ids: Vec<(i64,)> =
            sqlx::query_as("SELECT fee_id FROM event_fee WHERE event_id = $1")
                .bind(event_id)
                .fetch_all(&mut **tx)
                .await
                .context("Failed to fetch linked fees")?;

        sqlx::query("DELETE FROM event_fee WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut **tx)
            .await
            .context("Failed to unlink event fees")?;

        for (fee_id,) in fee_ids {
            sqlx::query("DELETE FROM fee WHERE fee_id = $1")
                .bind(fee_id)
                .execute(&mut **tx)
                .await
                .context("Failed to delete fee")?;
        }
        Ok(())
    }
}
