//! Event categories - CRUD operations.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryRow {
    pub category_id: i64,
    pub category_name: String,
    pub description: Option<String>,
    pub category_image: Option<String>,
}

/// A category together with how many events reference it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub category: CategoryRow,
    pub event_count: i64,
}

/// Fields to change; omitted fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub category_name: Option<String>,
    pub description: Option<String>,
    pub category_image: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>> {
        sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.category_id, c.category_name, c.description, c.category_image, COUNT(e.event_id) AS event_count FROM event_category c LEFT JOIN event e ON e.category_id = c.category_id GROUP BY c.category_id ORDER BY c.category_id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories")
    }

    pub async fn create(
        &self,
        category_name: &str,
        description: Option<&str>,
        category_image: Option<&str>,
    ) -> Result<CategoryRow> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO event_category (category_name, description, category_image) VALUES ($1, $2, $3) RETURNING category_id, category_name, description, category_image",
        )
        .bind(category_name)
        .bind(description)
        .bind(category_image)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create category")?;
        info!(category_id = row.category_id, name = %row.category_name, "created category");
        Ok(row)
    }

    /// Returns the updated row, or None when the id does not exist.
    pub async fn update(
        &self,
        category_id: i64,
        update: &CategoryUpdate,
    ) -> Result<Option<CategoryRow>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "UPDATE event_category SET category_name = COALESCE($1, category_name), description = COALESCE($2, description), category_image = COALESCE($3, category_image) WHERE category_id = $4 RETURNING category_id, category_name, description, category_image",
        )
        .bind(&update.category_name)
        .bind(&update.description)
        .bind(&update.category_image)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update category")?;
        if row.is_some() {
            info!(category_id, "updated category");
        }
        Ok(row)
    }

    pub async fn delete(&self, category_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM event_category WHERE category_id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete category")?;
        if result.rows_affected() > 0 {
            info!(category_id, "deleted category");
        }
        Ok(result.rows_affected() > 0)
    }
}
