//! Staff repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

use crate::{
    models::staff::{RegisterRequest, Staff},
    password::HashedPassword,
};

/// Unique constraint guarding staff email addresses
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";
/// Unique constraint guarding staff phone numbers
pub const PHONE_NUMBER_UNIQUE_CONSTRAINT: &str = "users_phone_number_key";

/// Staff repository
#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    /// Create a new staff repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new staff account
    pub async fn create(
        &self,
        request: &RegisterRequest,
        password: &HashedPassword,
    ) -> DatabaseResult<Staff> {
        info!("Creating staff account for: {}", request.phone_number);

        sqlx::query_as::<_, Staff>(
            r#"
            INSERT INTO users (email, name, phone_number, password, salt)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id, email, name, phone_number, password, salt, created_at, updated_at
            "#,
        )
        .bind(&request.email)
        .bind(&request.name)
        .bind(&request.phone_number)
        .bind(&password.hash)
        .bind(&password.salt)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    /// Find a staff account by phone number
    pub async fn find_by_phone_number(&self, phone_number: &str) -> DatabaseResult<Option<Staff>> {
        sqlx::query_as::<_, Staff>(
            r#"
            SELECT user_id, email, name, phone_number, password, salt, created_at, updated_at
            FROM users
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    /// Check whether a staff account still exists
    pub async fn exists(&self, user_id: i64) -> DatabaseResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE user_id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }
}
