//! User repository for database operations

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub user_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a partial user update
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub is_active: Option<bool>,
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Find a user by its caller-supplied identifier
    pub async fn find(pool: &PgPool, user_id: &str) -> sqlx::Result<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, user_id, is_active, created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Insert a new user with default attributes.
    ///
    /// A concurrent insert for the same identifier surfaces as a
    /// unique-constraint violation; the service maps it to `Conflict`.
    pub async fn insert(pool: &PgPool, user_id: &str) -> sqlx::Result<UserRecord> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (user_id)
            VALUES ($1)
            RETURNING id, user_id, is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Partially update a user; only supplied fields change
    pub async fn update(
        pool: &PgPool,
        user_id: &str,
        updates: UpdateUser,
    ) -> sqlx::Result<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users SET
                is_active = COALESCE($2, is_active),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING id, user_id, is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(updates.is_active)
        .fetch_optional(pool)
        .await
    }

    /// Delete a user.
    ///
    /// Owned calculations and metrics go with it via the ON DELETE CASCADE
    /// foreign keys, making the whole removal a single atomic statement.
    pub async fn delete(pool: &PgPool, user_id: &str) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a user exists
    pub async fn exists(pool: &PgPool, user_id: &str) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    // Repository behavior is covered by the integration tests in
    // backend/tests, which run against a real database.
}
