//! Merchandise - product catalog and orders.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::{FromRow, PgPool};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductRow {
    pub product_id: i64,
    pub product_name: String,
    pub price: Option<Decimal>,
    pub available_sizes: Option<Vec<String>>,
    pub product_image: Option<String>,
    pub description: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct NewProductFields {
    pub product_name: String,
    pub price: Option<Decimal>,
    pub available_sizes: Option<Vec<String>>,
    pub product_image: Option<String>,
    pub description: Option<String>,
    pub is_available: Option<bool>,
}

/// Fields to change; omitted fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub product_name: Option<String>,
    pub price: Option<Decimal>,
    pub available_sizes: Option<Vec<String>>,
    pub product_image: Option<String>,
    pub description: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderRow {
    pub order_id: i64,
    pub items: Option<JsonValue>,
    pub amount: Option<Decimal>,
    pub order_date: Option<DateTime<Utc>>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
}

/// Fields to change; omitted fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub items: Option<JsonValue>,
    pub amount: Option<Decimal>,
    pub order_date: Option<DateTime<Utc>>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
}

const PRODUCT_COLUMNS: &str =
    "product_id, product_name, price, available_sizes, product_image, description, is_available";
const ORDER_COLUMNS: &str =
    "order_id, items, amount, order_date, payment_status, payment_method";

#[derive(Clone, Debug)]
pub struct MerchandiseService {
    pool: PgPool,
}

impl MerchandiseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    pub async fn list_products(&self) -> Result<Vec<ProductRow>> {
        sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM merchandise_management ORDER BY product_id"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list products")
    }

    pub async fn get_product(&self, product_id: i64) -> Result<Option<ProductRow>> {
        sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM merchandise_management WHERE product_id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get product")
    }

    pub async fn create_product(&self, fields: &NewProductFields) -> Result<ProductRow> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO merchandise_management (product_name, price, available_sizes, product_image, description, is_available) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&fields.product_name)
        .bind(fields.price)
        .bind(&fields.available_sizes)
        .bind(&fields.product_image)
        .bind(&fields.description)
        .bind(fields.is_available)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create product")?;
        info!(product_id = row.product_id, name = %row.product_name, "created product");
        Ok(row)
    }

    /// Returns the updated row, or None when the id does not exist.
    pub async fn update_product(
        &self,
        product_id: i64,
        update: &ProductUpdate,
    ) -> Result<Option<ProductRow>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE merchandise_management SET product_name = COALESCE($1, product_name), price = COALESCE($2, price), available_sizes = COALESCE($3, available_sizes), product_image = COALESCE($4, product_image), description = COALESCE($5, description), is_available = COALESCE($6, is_available) WHERE product_id = $7 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&update.product_name)
        .bind(update.price)
        .bind(&update.available_sizes)
        .bind(&update.product_image)
        .bind(&update.description)
        .bind(update.is_available)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update product")?;
        if row.is_some() {
            info!(product_id, "updated product");
        }
        Ok(row)
    }

    /// Returns the deleted row (for image cleanup), or None when the
    /// id does not exist.
    pub async fn delete_product(&self, product_id: i64) -> Result<Option<ProductRow>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "DELETE FROM merchandise_management WHERE product_id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to delete product")?;
        if row.is_some() {
            info!(product_id, "deleted product");
        }
        Ok(row)
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    pub async fn list_orders(&self) -> Result<Vec<OrderRow>> {
        sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM merchandise_orders ORDER BY order_id"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list orders")
    }

    pub async fn get_order(&self, order_id: i64) -> Result<Option<OrderRow>> {
        sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM merchandise_orders WHERE order_id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get order")
    }

    /// Returns the updated row, or None when the id does not exist.
    pub async fn update_order(
        &self,
        order_id: i64,
        update: &OrderUpdate,
    ) -> Result<Option<OrderRow>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE merchandise_orders SET items = COALESCE($1, items), amount = COALESCE($2, amount), order_date = COALESCE($3, order_date), payment_status = COALESCE($4, payment_status), payment_method = COALESCE($5, payment_method) WHERE order_id = $6 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&update.items)
        .bind(update.amount)
        .bind(update.order_date)
        .bind(&update.payment_status)
        .bind(&update.payment_method)
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update order")?;
        if row.is_some() {
            info!(order_id, "updated order");
        }
        Ok(row)
    }

    pub async fn delete_order(&self, order_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM merchandise_orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete order")?;
        if result.rows_affected() > 0 {
            info!(order_id, "deleted order");
        }
        Ok(result.rows_affected() > 0)
    }
}
