//! Line-up artists - CRUD operations.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArtistRow {
    pub id: i64,
    pub name: String,
    pub concert_id: Option<i64>,
    pub genre: Option<String>,
    pub reveal_date: Option<NaiveDate>,
    pub bio: Option<String>,
    pub artist_image_url: Option<String>,
}

/// An artist with the name of the concert they play.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArtistWithConcert {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub artist: ArtistRow,
    pub concert_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewArtistFields {
    pub name: String,
    pub concert_id: i64,
    pub genre: Option<String>,
    pub reveal_date: NaiveDate,
    pub bio: Option<String>,
    pub artist_image_url: Option<String>,
}

const ARTIST_COLUMNS: &str = "id, name, concert_id, genre, reveal_date, bio, artist_image_url";

#[derive(Clone, Debug)]
pub struct ArtistService {
    pool: PgPool,
}

impl ArtistService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Artists in reveal order, with their concert names.
    pub async fn list_with_concerts(&self) -> Result<Vec<ArtistWithConcert>> {
        sqlx::query_as::<_, ArtistWithConcert>(
            "SELECT a.id, a.name, a.concert_id, a.genre, a.reveal_date, a.bio, a.artist_image_url, c.concert_name FROM artist a LEFT JOIN concert c ON c.concert_id = a.concert_id ORDER BY a.reveal_date",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list artists")
    }

    pub async fn create(&self, fields: &NewArtistFields) -> Result<ArtistRow> {
        let row = sqlx::query_as::<_, ArtistRow>(&format!(
            "INSERT INTO artist (name, concert_id, genre, reveal_date, bio, artist_image_url) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {ARTIST_COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(fields.concert_id)
        .bind(&fields.genre)
        .bind(fields.reveal_date)
        .bind(&fields.bio)
        .bind(&fields.artist_image_url)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create artist")?;
        info!(id = row.id, name = %row.name, "created artist");
        Ok(row)
    }

    /// Returns the deleted row (for image cleanup), or None when the
    /// id does not exist.
    pub async fn delete(&self, id: i64) -> Result<Option<ArtistRow>> {
        let row = sqlx::query_as::<_, ArtistRow>(&format!(
            "DELETE FROM artist WHERE id = $1 RETURNING {ARTIST_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to delete artist")?;
        if row.is_some() {
            info!(id, "deleted artist");
        }
        Ok(row)
    }
}
