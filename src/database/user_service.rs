//! User accounts.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub email: String,
    pub user_name: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub password_hash: String,
    pub password_salt: String,
}

#[derive(Debug, Clone)]
pub struct NewUserFields {
    pub email: String,
    pub user_name: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub password_hash: String,
    pub password_salt: String,
}

const USER_COLUMNS: &str =
    "user_id, email, user_name, phone, college, gender, dob, password_hash, password_salt";

#[derive(Clone, Debug)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, fields: &NewUserFields) -> Result<Uuid> {
        let user_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (user_id, email, user_name, phone, college, gender, dob, password_hash, password_salt) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(user_id)
        .bind(&fields.email)
        .bind(&fields.user_name)
        .bind(&fields.phone)
        .bind(&fields.college)
        .bind(&fields.gender)
        .bind(fields.dob)
        .bind(&fields.password_hash)
        .bind(&fields.password_salt)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;
        info!(%user_id, email = %fields.email, "created user");
        Ok(user_id)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by email")
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<UserRow>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user")
    }
}
